//! Utils

use clap::Parser;

/// Arguments for the selection example
#[derive(Debug, Parser)]
pub struct ExampleSelectArgs {
    /// Purchase price in major units (e.g. "70.00")
    #[clap(short, long)]
    pub price: String,

    /// Fixture set to load the wallet from
    #[clap(short, long, default_value = "birthday")]
    pub fixture: String,

    /// Number of cards to take from the wallet
    #[clap(short, long)]
    pub n: Option<usize>,

    /// Print the filled search table
    #[clap(short, long)]
    pub table: bool,

    /// Emit selection trace events to stderr
    #[clap(long)]
    pub trace: bool,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_price_with_defaults() -> TestResult {
        let args = ExampleSelectArgs::try_parse_from(["select", "--price", "70.00"])?;

        assert_eq!(args.price, "70.00");
        assert_eq!(args.fixture, "birthday");
        assert_eq!(args.n, None);
        assert!(!args.table);
        assert!(!args.trace);

        Ok(())
    }

    #[test]
    fn parses_all_flags() -> TestResult {
        let args = ExampleSelectArgs::try_parse_from([
            "select", "-p", "12.50", "-f", "mixed", "-n", "3", "--table", "--trace",
        ])?;

        assert_eq!(args.fixture, "mixed");
        assert_eq!(args.n, Some(3));
        assert!(args.table);
        assert!(args.trace);

        Ok(())
    }

    #[test]
    fn price_is_required() {
        assert!(ExampleSelectArgs::try_parse_from(["select"]).is_err());
    }
}
