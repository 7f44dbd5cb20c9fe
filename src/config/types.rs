use serde::{Deserialize, Serialize};

use crate::media::MediaKind;
use crate::overrides::Overrides;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Lookup service tried before falling back to local rendering.
    #[serde(default = "default_service")]
    pub default_service: String,

    /// Move and convert without asking.
    #[serde(default)]
    pub skip_prompts: bool,

    #[serde(default)]
    pub directories: Directories,

    #[serde(default)]
    pub templates: RenameTemplates,

    #[serde(default)]
    pub services: ServicesConfig,

    #[serde(default)]
    pub conversion: ConversionConfig,

    #[serde(default)]
    pub overrides: Overrides,
}

fn default_service() -> String {
    "omdb".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_service: default_service(),
            skip_prompts: false,
            directories: Directories::default(),
            templates: RenameTemplates::default(),
            services: ServicesConfig::default(),
            conversion: ConversionConfig::default(),
            overrides: Overrides::default(),
        }
    }
}

/// Base directories per media kind.
///
/// Values are `~`-expanded and may be templates rendered with no fields,
/// e.g. `{home_path "Videos/Movies"}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Directories {
    #[serde(default = "default_movies_dir")]
    pub movies: String,

    #[serde(default = "default_shows_dir")]
    pub shows: String,
}

fn default_movies_dir() -> String {
    "~/Videos/Movies".to_string()
}

fn default_shows_dir() -> String {
    "~/Videos/TV Shows".to_string()
}

impl Default for Directories {
    fn default() -> Self {
        Self {
            movies: default_movies_dir(),
            shows: default_shows_dir(),
        }
    }
}

impl Directories {
    pub fn for_kind(&self, kind: MediaKind) -> &str {
        match kind {
            MediaKind::Movies => &self.movies,
            MediaKind::Shows => &self.shows,
        }
    }
}

/// Filename templates per media kind.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RenameTemplates {
    #[serde(default = "default_movie_template")]
    pub movies: String,

    #[serde(default = "default_show_template")]
    pub shows: String,
}

fn default_movie_template() -> String {
    "{name} ({year}).{ext}".to_string()
}

fn default_show_template() -> String {
    "{name}{sep}{name} - Season {pad season 2}{sep}{name} - S{pad season 2}E{pad episode 2}.{ext}"
        .to_string()
}

impl Default for RenameTemplates {
    fn default() -> Self {
        Self {
            movies: default_movie_template(),
            shows: default_show_template(),
        }
    }
}

impl RenameTemplates {
    pub fn for_kind(&self, kind: MediaKind) -> &str {
        match kind {
            MediaKind::Movies => &self.movies,
            MediaKind::Shows => &self.shows,
        }
    }

    /// Default templates for OMDb results, which carry an episode title.
    pub fn omdb() -> Self {
        Self {
            movies: default_movie_template(),
            shows: "{name}{sep}{name} - Season {pad season 2}{sep}{name} - S{pad season 2}E{pad episode 2} - {title}.{ext}"
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServicesConfig {
    #[serde(default)]
    pub omdb: OmdbConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OmdbConfig {
    /// OMDb API key; the service is unavailable while this is empty.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_omdb_url")]
    pub base_url: String,

    #[serde(default = "RenameTemplates::omdb")]
    pub templates: RenameTemplates,

    /// Falls back to the top-level `[directories]` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directories: Option<Directories>,
}

fn default_omdb_url() -> String {
    "http://www.omdbapi.com/".to_string()
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_omdb_url(),
            templates: RenameTemplates::omdb(),
            directories: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConversionConfig {
    /// Convert without asking.
    #[serde(default)]
    pub auto_convert: bool,

    /// Target container extension, without the dot (default: "mkv")
    #[serde(default = "default_format")]
    pub format: String,

    /// Converter executable, looked up on PATH (default: "ffmpeg")
    #[serde(default = "default_converter")]
    pub converter: String,

    /// Converter arguments; `{old}` and `{new}` are the source and target paths.
    #[serde(default = "default_args_template")]
    pub args_template: String,
}

fn default_format() -> String {
    "mkv".to_string()
}

fn default_converter() -> String {
    "ffmpeg".to_string()
}

fn default_args_template() -> String {
    "-i {old} {new}".to_string()
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            auto_convert: false,
            format: default_format(),
            converter: default_converter(),
            args_template: default_args_template(),
        }
    }
}
