// --- Command-Line Arguments Struct ---
// Shared by every variant binary; each takes exactly two positionals.
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct VariantArgs {
    /// Path to the input CSV file
    pub input_file: PathBuf,

    /// Path to the output CSV file
    pub output_file: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_two_positionals_are_required() {
        let args = VariantArgs::try_parse_from(["tool", "in.csv", "out.csv"]).unwrap();
        assert_eq!(args.input_file, PathBuf::from("in.csv"));
        assert_eq!(args.output_file, PathBuf::from("out.csv"));

        let err = VariantArgs::try_parse_from(["tool", "in.csv"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let err = VariantArgs::try_parse_from(["tool", "a", "b", "c"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
        assert_eq!(err.exit_code(), 2);
    }
}
