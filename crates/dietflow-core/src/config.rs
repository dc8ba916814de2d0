//! Configuration parsing and validation
//!
//! This module handles loading and validating the `dietflow.yaml` project file.
//! Every setting has a default, so a project without a config file runs with
//! the built-in dataset location, artifact destination and diagram styling.
//!
//! # Example
//!
//! ```yaml
//! name: diet-impact
//! input:
//!   path: dataset/Results_21Mar2022.csv
//! output:
//!   path: sankey.html
//!   format: html
//! diagram:
//!   width: 1300
//!   height: 700
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};

/// File name looked up when a directory is given to [`Config::load`]
pub const CONFIG_FILE_NAME: &str = "dietflow.yaml";

/// Root project configuration from `dietflow.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectConfig {
    /// Project name
    #[serde(default = "default_name")]
    pub name: String,

    /// Dataset settings
    #[serde(default)]
    pub input: InputConfig,

    /// Artifact settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Diagram presentation settings
    #[serde(default)]
    pub diagram: DiagramConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            input: InputConfig::default(),
            output: OutputConfig::default(),
            diagram: DiagramConfig::default(),
        }
    }
}

fn default_name() -> String {
    "diet-impact".to_string()
}

/// Input dataset configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputConfig {
    /// Path to the delimited dataset
    #[serde(default = "default_input_path")]
    pub path: String,

    /// Field delimiter (single ASCII character)
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: default_input_path(),
            delimiter: default_delimiter(),
        }
    }
}

fn default_input_path() -> String {
    "dataset/Results_21Mar2022.csv".to_string()
}

fn default_delimiter() -> char {
    ','
}

/// Output artifact configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// Destination of the rendered artifact
    #[serde(default = "default_output_path")]
    pub path: String,

    /// Artifact format
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            format: OutputFormat::default(),
        }
    }
}

fn default_output_path() -> String {
    "sankey.html".to_string()
}

/// Artifact format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Standalone interactive HTML page
    #[default]
    Html,
    /// Plotly figure JSON
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Html => f.write_str("html"),
            Self::Json => f.write_str("json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            other => Err(Error::ConfigInvalid {
                message: format!("unknown output format '{}' (expected html or json)", other),
            }),
        }
    }
}

/// Diagram presentation settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagramConfig {
    /// Figure title
    #[serde(default = "default_title")]
    pub title: String,

    /// Font size in points
    #[serde(default = "default_font_size")]
    pub font_size: u32,

    /// Canvas width
    #[serde(default = "default_width")]
    pub width: u32,

    /// Canvas height
    #[serde(default = "default_height")]
    pub height: u32,

    /// Canvas margins
    #[serde(default)]
    pub margin: Margin,

    /// Node styling
    #[serde(default)]
    pub node: NodeStyle,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            font_size: default_font_size(),
            width: default_width(),
            height: default_height(),
            margin: Margin::default(),
            node: NodeStyle::default(),
        }
    }
}

fn default_title() -> String {
    "🌍 Sankey Diagram: Sex → Age → Diet → Environmental Impact (Normalized Core Indicators)"
        .to_string()
}

fn default_font_size() -> u32 {
    13
}

fn default_width() -> u32 {
    1300
}

fn default_height() -> u32 {
    700
}

/// Canvas margins, keyed the way the renderer expects them
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Margin {
    /// Left
    #[serde(default = "default_side_margin")]
    pub l: u32,
    /// Right
    #[serde(default = "default_side_margin")]
    pub r: u32,
    /// Top
    #[serde(default = "default_top_margin")]
    pub t: u32,
    /// Bottom
    #[serde(default = "default_side_margin")]
    pub b: u32,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            l: default_side_margin(),
            r: default_side_margin(),
            t: default_top_margin(),
            b: default_side_margin(),
        }
    }
}

fn default_side_margin() -> u32 {
    10
}

fn default_top_margin() -> u32 {
    50
}

/// Node styling
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeStyle {
    /// Vertical gap between nodes
    #[serde(default = "default_pad")]
    pub pad: u32,

    /// Node bar thickness
    #[serde(default = "default_thickness")]
    pub thickness: u32,

    /// Node border color
    #[serde(default = "default_line_color")]
    pub line_color: String,

    /// Node border width
    #[serde(default = "default_line_width")]
    pub line_width: f64,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            pad: default_pad(),
            thickness: default_thickness(),
            line_color: default_line_color(),
            line_width: default_line_width(),
        }
    }
}

fn default_pad() -> u32 {
    20
}

fn default_thickness() -> u32 {
    22
}

fn default_line_color() -> String {
    "black".to_string()
}

fn default_line_width() -> f64 {
    0.5
}

/// Main configuration container
#[derive(Debug, Clone)]
pub struct Config {
    /// Project configuration
    pub project: ProjectConfig,

    /// Directory relative paths are resolved against
    pub base_path: PathBuf,
}

impl Config {
    /// Load configuration from a file or a directory holding `dietflow.yaml`
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let config = Config::load("./my-project")?;
    /// println!("Project: {}", config.project.name);
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let (config_path, base_path) = Self::locate(path.as_ref());

        if !config_path.exists() {
            return Err(Error::ConfigNotFound {
                path: config_path.display().to_string(),
            });
        }

        let contents = std::fs::read_to_string(&config_path)?;
        let project: ProjectConfig = serde_yaml::from_str(&contents)?;
        tracing::debug!("Loaded configuration from {}", config_path.display());

        Self::new(project, base_path)
    }

    /// Like [`Config::load`], but a missing file yields the defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match Self::load(path) {
            Err(Error::ConfigNotFound { path: missing }) => {
                tracing::debug!("No configuration at {}, using defaults", missing);
                let (_, base_path) = Self::locate(path);
                Self::new(ProjectConfig::default(), base_path)
            }
            other => other,
        }
    }

    /// Build a validated configuration from parts
    pub fn new(project: ProjectConfig, base_path: impl Into<PathBuf>) -> Result<Self> {
        let config = Self {
            project,
            base_path: base_path.into(),
        };
        config.validate()?;
        Ok(config)
    }

    fn locate(path: &Path) -> (PathBuf, PathBuf) {
        if path.is_dir() {
            (path.join(CONFIG_FILE_NAME), path.to_path_buf())
        } else {
            (
                path.to_path_buf(),
                path.parent().unwrap_or(Path::new(".")).to_path_buf(),
            )
        }
    }

    /// Check values serde cannot reject on its own
    pub fn validate(&self) -> Result<()> {
        let project = &self.project;
        if project.input.path.trim().is_empty() {
            return Err(invalid("input.path must not be empty"));
        }
        if project.output.path.trim().is_empty() {
            return Err(invalid("output.path must not be empty"));
        }
        let delimiter = project.input.delimiter;
        if !delimiter.is_ascii() || matches!(delimiter, '"' | '\n' | '\r') {
            return Err(invalid(format!(
                "input.delimiter '{}' must be a single ASCII character other than a quote or newline",
                delimiter.escape_default()
            )));
        }

        let diagram = &project.diagram;
        if diagram.width == 0 || diagram.height == 0 {
            return Err(invalid("diagram.width and diagram.height must be positive"));
        }
        if diagram.font_size == 0 {
            return Err(invalid("diagram.font_size must be positive"));
        }
        if !diagram.node.line_width.is_finite() || diagram.node.line_width < 0.0 {
            return Err(invalid("diagram.node.line_width must be a non-negative number"));
        }
        Ok(())
    }

    /// Input settings with the dataset path resolved against the project directory
    pub fn input(&self) -> InputConfig {
        InputConfig {
            path: self.resolve(&self.project.input.path).display().to_string(),
            delimiter: self.project.input.delimiter,
        }
    }

    /// Resolved dataset path
    pub fn input_path(&self) -> PathBuf {
        self.resolve(&self.project.input.path)
    }

    /// Resolved artifact path
    pub fn output_path(&self) -> PathBuf {
        self.resolve(&self.project.output.path)
    }

    /// Replace the dataset path
    pub fn set_input_path(&mut self, path: impl AsRef<Path>) {
        self.project.input.path = path.as_ref().display().to_string();
    }

    /// Replace the artifact path
    pub fn set_output_path(&mut self, path: impl AsRef<Path>) {
        self.project.output.path = path.as_ref().display().to_string();
    }

    /// Replace the artifact format
    pub fn set_output_format(&mut self, format: OutputFormat) {
        self.project.output.format = format;
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }
}

fn invalid(message: impl Into<String>) -> Error {
    Error::ConfigInvalid {
        message: message.into(),
    }
}
