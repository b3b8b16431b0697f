use clap::Parser;

/// This is a summary program for constituency election results.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON file describing the data sources, the constituencies and the parties.
    /// See the manual of the election_tally crate for the format.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference summary in JSON format. If provided, bengaltally will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary will be written in JSON format to the given
    /// location. Setting this option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) The file containing the election results. Setting this option overrides
    /// the data sources of the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv) The type of the input: csv or xlsx.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (year) The first year of the comparison. Requires --year-b.
    #[clap(long, value_parser, requires = "year_b")]
    pub year_a: Option<u32>,

    /// (year) The second year of the comparison. Requires --year-a.
    #[clap(long, value_parser, requires = "year_a")]
    pub year_b: Option<u32>,

    /// Only aggregate the results of the constituencies of this district (case insensitive).
    #[clap(long, value_parser)]
    pub district: Option<String>,

    /// Only aggregate the results of the constituencies whose name or district contains this text.
    #[clap(long, value_parser)]
    pub search: Option<String>,

    /// If passed as an argument, drops the records that do not have a valid election year.
    #[clap(long, takes_value = false)]
    pub strict: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
