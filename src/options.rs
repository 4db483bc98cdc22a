use std::{path::PathBuf, str::FromStr};

use termcolor::ColorChoice;

pub const DEFAULT_WIDTH: usize = 80;

pub struct Options {
    pub print_syntax: bool,
    pub width: usize,
    pub color: ColorMode,
    /// Read from stdin when absent.
    pub filename: Option<PathBuf>,
}

impl Options {
    pub fn new() -> Self {
        Options {
            print_syntax: false,
            width: default_width(),
            color: ColorMode::Auto,
            filename: None,
        }
    }

    pub fn parse() -> Result<Self, String> {
        parse()
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}

fn default_width() -> usize {
    std::env::var("ELLC_WIDTH")
        .ok()
        .and_then(|width| width.parse().ok())
        .unwrap_or(DEFAULT_WIDTH)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Always,
    Never,
    Auto,
}

impl ColorMode {
    pub fn choice(self) -> ColorChoice {
        match self {
            ColorMode::Always => ColorChoice::Always,
            ColorMode::Never => ColorChoice::Never,
            ColorMode::Auto => ColorChoice::Auto,
        }
    }
}

impl FromStr for ColorMode {
    type Err = &'static str;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_lowercase();
        let s: &str = &s;

        match s {
            "always" => Ok(ColorMode::Always),
            "never" => Ok(ColorMode::Never),
            "auto" => Ok(ColorMode::Auto),
            _ => Err("Invalid color mode"),
        }
    }
}

pub fn parse() -> Result<Options, String> {
    parse_from(pico_args::Arguments::from_env())
}

pub fn parse_from(mut args: pico_args::Arguments) -> Result<Options, String> {
    let mut options = Options::new();

    if args.contains(["-h", "--help"]) {
        println!("Usage: ellc [options] [input file]");
        println!("Options:");
        println!("  -h, --help: Print this help message");
        println!("  --print-syntax: Print the syntax tree before normalizing");
        println!("  --width <n>: Pretty-printer width (default: $ELLC_WIDTH or 80)");
        println!("  --color <always|never|auto>: Colorize output (default: auto)");
        std::process::exit(0);
    }

    options.print_syntax = args.contains("--print-syntax");

    match args.opt_value_from_str::<_, usize>("--width") {
        Ok(Some(width)) => options.width = width,
        Ok(None) => (),
        Err(e) => return Err(e.to_string()),
    }

    match args.opt_value_from_str::<_, ColorMode>("--color") {
        Ok(Some(color)) => options.color = color,
        Ok(None) => (),
        Err(e) => return Err(e.to_string()),
    }

    options.filename = match args.opt_free_from_str::<PathBuf>() {
        Ok(filename) => filename,
        Err(e) => return Err(e.to_string()),
    };

    let rest = args.finish();
    if !rest.is_empty() {
        return Err(format!("unexpected arguments: {:?}", rest));
    }

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    fn args(list: &[&str]) -> pico_args::Arguments {
        pico_args::Arguments::from_vec(list.iter().map(OsString::from).collect())
    }

    #[test]
    fn defaults() {
        let options = parse_from(args(&[])).unwrap();
        assert!(!options.print_syntax);
        assert_eq!(options.color, ColorMode::Auto);
        assert!(options.filename.is_none());
    }

    #[test]
    fn all_flags() {
        let options = parse_from(args(&[
            "--print-syntax",
            "--width",
            "40",
            "--color",
            "never",
            "prog.ell",
        ]))
        .unwrap();
        assert!(options.print_syntax);
        assert_eq!(options.width, 40);
        assert_eq!(options.color.choice(), ColorChoice::Never);
        assert_eq!(options.filename, Some(PathBuf::from("prog.ell")));
    }

    #[test]
    fn bad_values() {
        assert!(parse_from(args(&["--width", "wide"])).is_err());
        assert!(parse_from(args(&["--color", "sometimes"])).is_err());
        assert!(parse_from(args(&["a.ell", "b.ell"])).is_err());
    }
}
