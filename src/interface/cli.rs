use clap::{App, ArgMatches};

/// Largest accepted window dimension, in pixels.
pub const MAX_DIMENSION: u32 = 16384;

/// Everything the demo can be told from the command line. With no arguments: a 640x480
/// "Hello World" window, vsync on, filled polygons.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub vsync: bool,
    pub wireframe: bool,
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            width: 640,
            height: 480,
            title: String::from("Hello World"),
            vsync: true,
            wireframe: false,
            log_level: None,
        }
    }
}

impl Config {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, clap::Error> {
        let width = value_t!(matches, "width", u32)?;
        let height = value_t!(matches, "height", u32)?;

        if width == 0 || height == 0 {
            return Err(clap::Error::with_description(
                "window dimensions must be non-zero",
                clap::ErrorKind::InvalidValue,
            ));
        }

        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(clap::Error::with_description(
                &format!("window dimensions must be at most {}", MAX_DIMENSION),
                clap::ErrorKind::InvalidValue,
            ));
        }

        Ok(Config {
            width,
            height,
            title: matches.value_of("title").unwrap_or("Hello World").to_owned(),
            vsync: !matches.is_present("no-vsync"),
            wireframe: matches.is_present("wireframe"),
            log_level: matches.value_of("log-level").map(str::to_owned),
        })
    }
}

/// Parses `args` (including the binary name).
pub fn parse_from<I, T>(args: I) -> Result<Config, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let yaml = load_yaml!("cli.yaml");
    let matches = App::from_yaml(yaml).get_matches_from_safe(args)?;
    Config::from_matches(&matches)
}

/// Parses the process arguments, printing usage and exiting on bad input.
pub fn cli_main() -> Config {
    parse_from(std::env::args_os()).unwrap_or_else(|e| e.exit())
}
