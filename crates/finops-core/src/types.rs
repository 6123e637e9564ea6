use clap::ValueEnum;

/// Output format for CLI responses
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_value_enum() {
        let variants = OutputFormat::value_variants();
        assert_eq!(variants.len(), 2);
        assert!(variants.contains(&OutputFormat::Text));
        assert!(variants.contains(&OutputFormat::Json));
    }
}
