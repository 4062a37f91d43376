//! Alphabet selection from the command line and an optional TOML file.
//!
//! Flags given on the command line take precedence over the values in the file.

use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use clap::Args;
use lib_stitch::alphabet::{Alphabet, AlphabetSource, GapPenalties, MatrixFormat, Score};
use log::info;
use serde::Deserialize;

#[derive(Args)]
pub struct AlphabetArgs {
    /// The scoring matrix file.
    ///
    /// If neither this nor the configuration file names a matrix, BLOSUM62 is used.
    #[clap(long, short = 'a')]
    alphabet: Option<PathBuf>,

    /// The penalty for opening a gap.
    #[clap(long)]
    gap_start_penalty: Option<Score>,

    /// The penalty for extending an open gap by one position.
    #[clap(long)]
    gap_extend_penalty: Option<Score>,

    /// A TOML file with alphabet settings.
    ///
    /// It may contain `alphabet` (a path), `alphabet_data` (the matrix itself),
    /// `gap_start_penalty`, `gap_extend_penalty` and `delimiters`.
    #[clap(long, short = 'c')]
    config: Option<PathBuf>,
}

/// The contents of the configuration file.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Configuration {
    pub alphabet: Option<PathBuf>,
    pub alphabet_data: Option<String>,
    pub gap_start_penalty: Option<Score>,
    pub gap_extend_penalty: Option<Score>,
    pub delimiters: Option<Vec<char>>,
}

impl Configuration {
    pub fn from_toml(text: &str) -> Result<Self> {
        let configuration: Self = toml::from_str(text)?;
        ensure!(
            configuration.alphabet.is_none() || configuration.alphabet_data.is_none(),
            "The configuration gives both an alphabet path and alphabet data"
        );
        Ok(configuration)
    }
}

impl AlphabetArgs {
    pub fn configuration(&self) -> Result<Configuration> {
        let Some(path) = &self.config else {
            return Ok(Configuration::default());
        };

        info!("Loading configuration file {path:?}");
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Unable to read configuration file {path:?}"))?;
        Configuration::from_toml(&text)
            .with_context(|| format!("Invalid configuration file {path:?}"))
    }

    pub fn load_alphabet(&self) -> Result<Alphabet> {
        let configuration = self.configuration()?;
        let defaults = GapPenalties::default();
        let gap_penalties = GapPenalties {
            start: self
                .gap_start_penalty
                .or(configuration.gap_start_penalty)
                .unwrap_or(defaults.start),
            extend: self
                .gap_extend_penalty
                .or(configuration.gap_extend_penalty)
                .unwrap_or(defaults.extend),
        };
        let format = configuration
            .delimiters
            .map(|delimiters| MatrixFormat { delimiters })
            .unwrap_or_default();

        let source = if let Some(path) = self.alphabet.clone().or(configuration.alphabet) {
            AlphabetSource::Path(path)
        } else if let Some(data) = configuration.alphabet_data {
            AlphabetSource::Text(data)
        } else {
            info!("Using the built-in BLOSUM62 alphabet");
            return Alphabet::blosum62(gap_penalties).context("Unable to load BLOSUM62");
        };

        Alphabet::load_with_format(&source, gap_penalties, &format)
            .with_context(|| format!("Unable to load alphabet from {source:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::Configuration;

    #[test]
    fn parse_configuration() {
        let configuration = Configuration::from_toml(
            "alphabet = \"test_files/identity.csv\"\ngap_start_penalty = 2\ndelimiters = [\";\"]\n",
        )
        .unwrap();
        assert_eq!(
            configuration,
            Configuration {
                alphabet: Some("test_files/identity.csv".into()),
                gap_start_penalty: Some(2),
                delimiters: Some(vec![';']),
                ..Default::default()
            }
        );

        assert!(Configuration::from_toml("unknown = 1").is_err());
        assert!(
            Configuration::from_toml("alphabet = \"a.csv\"\nalphabet_data = \"*;A\\nA;1\"").is_err()
        );
    }
}
