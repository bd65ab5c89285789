use clap::{Parser, Subcommand};

/// This program turns a decision model written in a spreadsheet into a static,
/// browsable web site.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Command,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generates the pages of the site.
    Generate(GenerateArgs),
    /// Prints the content of the model and the number of pages needed to enumerate it.
    Info(InfoArgs),
    /// Applies a selection to the model and prints the ranked answers.
    Navigate(NavigateArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// (file path) The model, as an Excel (.xlsx) or CSV file. See the documentation for the layout of the sheet.
    #[clap(short, long, value_parser)]
    pub data: String,

    /// (file path, optional) A JSON file with the translations of the labels displayed on the pages.
    #[clap(short, long, value_parser)]
    pub translation: Option<String>,

    /// (file path, optional) A JSON file with settings (answerColumn, pageTitle, subpageDir, ranking). They take
    /// precedence over the Config: section of the sheet.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// If passed as an argument, the navigation script is embedded in the index page instead of being copied next to it.
    #[clap(long, takes_value = false)]
    pub embedscripts: bool,

    /// (directory) Where the pages are written.
    #[clap(short, long, value_parser)]
    pub outdir: String,

    /// (file path, optional) A reference file containing the values and weights of the model in JSON format. If
    /// provided, rankgen will check that the processed model matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct InfoArgs {
    /// (file path) The model, as an Excel (.xlsx) or CSV file.
    #[clap(short, long, value_parser)]
    pub data: String,

    /// (file path, optional) A JSON file with settings.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct NavigateArgs {
    /// (file path) The model, as an Excel (.xlsx) or CSV file.
    #[clap(short, long, value_parser)]
    pub data: String,

    /// (file path, optional) A JSON file with settings.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (characteristic=value, repeated) A value to select. Selecting several values of the same characteristic
    /// accepts any of them.
    #[clap(short, long, value_parser)]
    pub select: Vec<String>,

    /// (mean or product) How the scores of the characteristics are combined. Overrides the settings.
    #[clap(long, value_parser)]
    pub ranking: Option<String>,
}
