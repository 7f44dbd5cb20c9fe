use clap::Parser;
use scenerename::config::Config;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scenerename")]
#[command(
    author,
    version,
    about = "Rename and organize video files from their release names"
)]
pub struct Cli {
    /// Video files to rename
    pub files: Vec<PathBuf>,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Move files without asking
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,

    /// Directory for movies (may be a template)
    #[arg(short, long, value_name = "DIR")]
    pub movies: Option<String>,

    /// Directory for shows (may be a template)
    #[arg(short, long, value_name = "DIR")]
    pub shows: Option<String>,

    /// Lookup service to try first
    #[arg(long, value_name = "NAME")]
    pub service: Option<String>,

    /// OMDb API key
    #[arg(long, value_name = "KEY")]
    pub omdb_key: Option<String>,

    /// Template for movie filenames
    #[arg(long, value_name = "TEMPLATE")]
    pub movie_template: Option<String>,

    /// Template for show filenames
    #[arg(long, value_name = "TEMPLATE")]
    pub show_template: Option<String>,

    /// Template for movie filenames found on OMDb
    #[arg(long, value_name = "TEMPLATE")]
    pub omdb_movie_template: Option<String>,

    /// Template for show filenames found on OMDb
    #[arg(long, value_name = "TEMPLATE")]
    pub omdb_show_template: Option<String>,

    /// Convert files without asking
    #[arg(short, long)]
    pub auto_convert: bool,

    /// Target container extension for conversion
    #[arg(short = 'f', long, value_name = "EXT")]
    pub convert_format: Option<String>,

    /// Converter executable
    #[arg(long, value_name = "PROGRAM")]
    pub converter: Option<String>,

    /// Converter arguments; {old} and {new} are the source and target paths
    #[arg(long, value_name = "TEMPLATE")]
    pub convert_args: Option<String>,

    /// Replace any title containing PATTERN with REPLACEMENT (saved to the config)
    #[arg(long, num_args = 2, value_names = ["PATTERN", "REPLACEMENT"])]
    pub add_override: Option<Vec<String>>,

    /// Remove a saved override
    #[arg(long, value_name = "PATTERN")]
    pub rm_override: Option<String>,

    /// Save the effective configuration, including the flags above
    #[arg(long)]
    pub save_config: bool,

    /// Print where each file would go without moving anything
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Overlay flags on a loaded config.
    pub fn apply_to(&self, config: &mut Config) {
        if self.yes {
            config.skip_prompts = true;
        }
        if let Some(dir) = &self.movies {
            config.directories.movies = dir.clone();
        }
        if let Some(dir) = &self.shows {
            config.directories.shows = dir.clone();
        }
        if let Some(service) = &self.service {
            config.default_service = service.clone();
        }
        if let Some(key) = &self.omdb_key {
            config.services.omdb.api_key = key.clone();
        }
        if let Some(template) = &self.movie_template {
            config.templates.movies = template.clone();
        }
        if let Some(template) = &self.show_template {
            config.templates.shows = template.clone();
        }
        if let Some(template) = &self.omdb_movie_template {
            config.services.omdb.templates.movies = template.clone();
        }
        if let Some(template) = &self.omdb_show_template {
            config.services.omdb.templates.shows = template.clone();
        }
        if self.auto_convert {
            config.conversion.auto_convert = true;
        }
        if let Some(format) = &self.convert_format {
            config.conversion.format = format.trim_start_matches('.').to_string();
        }
        if let Some(converter) = &self.converter {
            config.conversion.converter = converter.clone();
        }
        if let Some(args) = &self.convert_args {
            config.conversion.args_template = args.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "scenerename",
            "-y",
            "-m",
            "/srv/movies",
            "--omdb-key",
            "abc",
            "-f",
            ".mp4",
            "--add-override",
            "show name",
            "Renamed Show",
            "a.mkv",
        ]);
        let mut config = Config::default();
        cli.apply_to(&mut config);

        assert!(config.skip_prompts);
        assert_eq!(config.directories.movies, "/srv/movies");
        assert_eq!(config.services.omdb.api_key, "abc");
        assert_eq!(config.conversion.format, "mp4");
        assert_eq!(
            cli.add_override.as_deref(),
            Some(&["show name".to_string(), "Renamed Show".to_string()][..])
        );
        assert_eq!(cli.files, vec![PathBuf::from("a.mkv")]);
    }
}
