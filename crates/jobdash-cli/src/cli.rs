//! CLI argument definitions using clap.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use jobdash::filter::DateSelection;
use jobdash::{
    Backend, DashboardConfig, FileBackend, FilterCriteria, FilterOptions, ParserConfig,
    SheetBackend, SheetCredentials, SheetsClient, ViewMode,
};

/// Jobdash: filterable job-listing dashboards
#[derive(Parser)]
#[command(name = "jobdash")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve an interactive dashboard in the browser
    Serve {
        #[command(flatten)]
        source: SourceArgs,

        /// Dashboard variant
        #[arg(long, default_value = "favorites")]
        preset: Preset,

        /// Page title
        #[arg(long)]
        title: Option<String>,

        /// Port for web server
        #[arg(short, long, default_value = "8501")]
        port: u16,

        /// Don't automatically open browser
        #[arg(long)]
        no_open: bool,

        /// Seconds between automatic page reloads
        #[arg(long, default_value = "60")]
        refresh: u64,
    },

    /// Print the metrics of a filtered view
    Summary {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// Dashboard variant
        #[arg(long, default_value = "favorites")]
        preset: Preset,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a filtered view to a CSV file
    Export {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// Dashboard variant
        #[arg(long, default_value = "favorites")]
        preset: Preset,

        /// Output path (.tsv writes tab-separated)
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Where the job table comes from.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Local CSV/TSV file
    #[arg(long, value_name = "FILE", conflicts_with = "sheet", required_unless_present = "sheet")]
    pub csv: Option<PathBuf>,

    /// Encoding of the local file (e.g. utf-8, windows-1252)
    #[arg(long, requires = "csv")]
    pub encoding: Option<String>,

    /// Spreadsheet ID
    #[arg(long, value_name = "ID", requires_all = ["worksheet", "credentials"])]
    pub sheet: Option<String>,

    /// Worksheet name within the spreadsheet
    #[arg(long, value_name = "NAME", requires = "sheet")]
    pub worksheet: Option<String>,

    /// JSON file holding an OAuth access token
    #[arg(long, value_name = "FILE", requires = "sheet")]
    pub credentials: Option<PathBuf>,
}

impl SourceArgs {
    /// Build the backend the flags describe.
    ///
    /// Sheet clients use a blocking HTTP client, so this must run outside
    /// the async runtime.
    pub fn backend(&self) -> Result<Box<dyn Backend>, Box<dyn std::error::Error>> {
        if let Some(path) = &self.csv {
            let mut config = ParserConfig::default();
            if let Some(label) = &self.encoding {
                config = config.with_encoding_label(label)?;
            }
            return Ok(Box::new(FileBackend::with_config(path, config)));
        }

        match (&self.sheet, &self.worksheet, &self.credentials) {
            (Some(sheet), Some(worksheet), Some(credentials)) => {
                let credentials = SheetCredentials::load(credentials)?;
                let client = SheetsClient::new(credentials)?;
                Ok(Box::new(SheetBackend::new(
                    sheet.clone(),
                    worksheet.clone(),
                    Arc::new(client),
                )))
            }
            _ => Err("Specify --csv FILE or --sheet ID --worksheet NAME --credentials FILE".into()),
        }
    }
}

/// Filter flags for one-shot commands.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only show favorites
    #[arg(long)]
    pub favorites: bool,

    /// Category selection, repeatable (e.g. --category Location=Austin)
    #[arg(long = "category", value_name = "COLUMN=VALUE")]
    pub categories: Vec<String>,

    /// Lowest project value to include
    #[arg(long)]
    pub min_value: Option<f64>,

    /// Highest project value to include
    #[arg(long)]
    pub max_value: Option<f64>,

    /// Earliest bid date to include (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Latest bid date to include (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

impl FilterArgs {
    pub fn criteria(&self) -> Result<FilterCriteria, String> {
        let mut criteria = FilterCriteria::new();

        if self.favorites {
            criteria = criteria.with_view(ViewMode::Favorites);
        }

        for selection in &self.categories {
            let (column, value) = selection
                .split_once('=')
                .ok_or_else(|| format!("Invalid category '{}'. Use COLUMN=VALUE.", selection))?;
            criteria
                .categories
                .entry(column.trim().to_string())
                .or_default()
                .push(value.trim().to_string());
        }

        if self.min_value.is_some() || self.max_value.is_some() {
            criteria = criteria.with_value_range(
                self.min_value.unwrap_or(f64::NEG_INFINITY),
                self.max_value.unwrap_or(f64::INFINITY),
            );
        }

        if self.from.is_some() || self.to.is_some() {
            criteria = criteria.with_date_range(DateSelection::Range(
                self.from.unwrap_or(NaiveDate::MIN),
                self.to.unwrap_or(NaiveDate::MAX),
            ));
        }

        Ok(criteria)
    }

    /// Preset filter options extended with any category column named on the command line.
    pub fn options(&self, base: FilterOptions) -> FilterOptions {
        let mut columns = base.category_columns.clone();
        for selection in &self.categories {
            if let Some((column, _)) = selection.split_once('=') {
                let column = column.trim().to_string();
                if !columns.contains(&column) {
                    columns.push(column);
                }
            }
        }
        base.with_category_columns(columns)
    }
}

/// Dashboard variant
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Preset {
    /// Editable, with a favorites toggle
    #[default]
    Favorites,
    /// Read-only, with job title and location filters
    Categories,
}

impl Preset {
    pub fn config(&self) -> DashboardConfig {
        match self {
            Preset::Favorites => DashboardConfig::favorites(),
            Preset::Categories => DashboardConfig::categories(),
        }
    }
}

impl std::str::FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "favorites" | "favourites" => Ok(Preset::Favorites),
            "categories" => Ok(Preset::Categories),
            _ => Err(format!("Unknown preset: {}. Use favorites or categories.", s)),
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Preset::Favorites => write!(f, "favorites"),
            Preset::Categories => write!(f, "categories"),
        }
    }
}
