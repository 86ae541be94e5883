mod config;
mod output;
mod theme;

use anyhow::{Context, Result};
use clap::{
    ColorChoice, Command, CommandFactory, FromArgMatches, Parser,
    builder::{
        Styles,
        styling::{AnsiColor, Color as ClapColor, RgbColor, Style},
    },
    error::ErrorKind,
};
use colored::{Color as ThemeColor, Colorize, control::ShouldColorize};
use std::fmt::Write;
use std::io;
use std::path::PathBuf;

use config::{CONFIG_FILE, Settings};
use gen_fields_build::generate_fields;
use output::{GlobalOptions, OutputFormat, OutputManager};
use theme::{ICONS, THEME};

const ENVIRONMENT_VARIABLES: &[(&str, &str)] = &[
    ("GEN_FIELDS_DIR", "Package directory to scan"),
    ("GEN_FIELDS_SOURCE", "Name of the Go file holding the tagged structs"),
    ("GEN_FIELDS_OUT_DIR", "Directory that receives <package>-fields.go"),
    ("RUST_LOG", "Log filter, e.g. gen_fields_build=debug"),
];

const EXAMPLES: &[(&str, &[&str])] = &[
    ("Generate next to ./ipinfo.go", &["gen-fields"]),
    (
        "Scan several packages",
        &["gen-fields -d ./ipinfo -d ./asn", "gen-fields -d ./geo -s geo.go"],
    ),
    (
        "Write elsewhere and report as JSON",
        &["gen-fields -o ./generated --output json"],
    ),
];

#[derive(Parser)]
#[command(name = "gen-fields")]
#[command(version)]
#[command(
    about = "Generate Go field accessors from tagged struct fields",
    long_about = r#"Scans a Go package file (ipinfo.go by default) for tagged string fields
and writes <package>-fields.go with one accessor pair per field:

• Get<Name>(ip) as a package-level function using the shared client
• (*Client).Get<Name>(ip), routed through the client cache when present
• (*Client).request<Name>(s), which fetches the raw field value

Options are read from flags, then the environment, then gen-fields.toml in
the first scanned directory.
"#
)]
struct Cli {
    /// Package directory to scan (repeatable, defaults to the current directory)
    #[arg(short = 'd', long = "dir", value_name = "DIR", env = "GEN_FIELDS_DIR")]
    dirs: Vec<PathBuf>,

    /// File name to look for in each directory [default: ipinfo.go]
    #[arg(short = 's', long = "source", value_name = "FILE", env = "GEN_FIELDS_SOURCE")]
    source: Option<String>,

    /// Directory for generated files (defaults to the scanned directory)
    #[arg(short = 'o', long = "out-dir", value_name = "DIR", env = "GEN_FIELDS_OUT_DIR")]
    out_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    output: OutputFormat,

    /// Suppress output (only errors will be shown)
    #[arg(short = 'q', long)]
    quiet: bool,

    /// List every generated accessor
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

impl Cli {
    fn parse_with_styles() -> Self {
        let command = build_cli_command();
        let parsed = command
            .styles(help_styles())
            .try_get_matches()
            .and_then(|matches| Cli::from_arg_matches(&matches));

        match parsed {
            Ok(cli) => cli,
            Err(err) => {
                let exit_code = match err.kind() {
                    ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                    _ => err.exit_code(),
                };
                if let Err(print_err) = err.print()
                    && print_err.kind() != io::ErrorKind::BrokenPipe
                {
                    eprintln!("Failed to display error: {print_err}");
                }
                std::process::exit(exit_code);
            }
        }
    }
}

fn build_cli_command() -> Command {
    let use_color = detect_color_support();
    let appendix = render_appendix(use_color);
    Cli::command()
        .after_long_help(appendix)
        .color(if use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        })
}

fn render_appendix(use_color: bool) -> String {
    let theme = &THEME;
    let mut buffer = String::new();

    let heading = stylize("Examples:", theme.highlight, true, use_color);
    let _ = writeln!(buffer, "{heading}");
    for (title, commands) in EXAMPLES {
        let title = stylize(title, theme.primary, true, use_color);
        let _ = writeln!(buffer, "  {title}");
        for command in *commands {
            let arrow = stylize(ICONS.arrow, theme.secondary, false, use_color);
            let command_text = stylize(command, theme.secondary, false, use_color);
            let _ = writeln!(buffer, "    {arrow} {command_text}");
        }
    }
    buffer.push('\n');

    let env_heading = stylize("Environment Variables:", theme.highlight, true, use_color);
    let _ = writeln!(buffer, "{env_heading}");
    for (key, description) in ENVIRONMENT_VARIABLES {
        let key_text = stylize(key, theme.key, true, use_color);
        let _ = writeln!(buffer, "  {key_text}  {description}");
    }
    buffer.push('\n');

    let tip_heading = stylize("Config:", theme.highlight, true, use_color);
    let tip_text = stylize(
        &format!("{CONFIG_FILE} may set [generator] source_file and out_dir."),
        theme.muted,
        false,
        use_color,
    );
    let _ = writeln!(buffer, "{tip_heading} {tip_text}");

    buffer
}

fn stylize(text: &str, color: ThemeColor, bold: bool, use_color: bool) -> String {
    if use_color {
        let styled = text.color(color);
        if bold {
            styled.bold().to_string()
        } else {
            styled.to_string()
        }
    } else {
        text.to_string()
    }
}

fn detect_color_support() -> bool {
    ShouldColorize::from_env().should_colorize()
}

fn help_styles() -> Styles {
    let theme = &THEME;
    Styles::styled()
        .usage(style_from_color(theme.primary).bold())
        .header(style_from_color(theme.highlight).bold())
        .literal(style_from_color(theme.secondary))
        .placeholder(style_from_color(theme.muted))
        .valid(style_from_color(theme.success))
        .invalid(style_from_color(theme.warning))
        .error(style_from_color(theme.error).bold())
}

fn style_from_color(color: ThemeColor) -> Style {
    Style::new().fg_color(Some(color_to_clap_color(color)))
}

fn color_to_clap_color(color: ThemeColor) -> ClapColor {
    let ansi = match color {
        ThemeColor::TrueColor { r, g, b } => return ClapColor::Rgb(RgbColor(r, g, b)),
        ThemeColor::Red => AnsiColor::Red,
        ThemeColor::Green => AnsiColor::Green,
        ThemeColor::Yellow => AnsiColor::Yellow,
        ThemeColor::Blue => AnsiColor::Blue,
        ThemeColor::Magenta => AnsiColor::Magenta,
        ThemeColor::Cyan => AnsiColor::Cyan,
        ThemeColor::BrightBlack => AnsiColor::BrightBlack,
        ThemeColor::BrightBlue => AnsiColor::BrightBlue,
        ThemeColor::BrightCyan => AnsiColor::BrightCyan,
        _ => AnsiColor::White,
    };
    ClapColor::Ansi(ansi)
}

fn main() {
    env_logger::init();

    let cli = Cli::parse_with_styles();
    let output = OutputManager::new(GlobalOptions {
        output_format: cli.output.clone(),
        quiet: cli.quiet,
        verbose: cli.verbose,
        no_color: cli.no_color,
    });

    if let Err(err) = execute(cli, &output) {
        output.error(&format!("Error: {err:#}"));
        std::process::exit(1);
    }
}

fn execute(cli: Cli, output: &OutputManager) -> Result<()> {
    let settings = Settings::resolve(cli.dirs, cli.source, cli.out_dir)?;

    let mut generator = generate_fields().source_file(settings.source_file.as_str());
    for dir in &settings.dirs {
        generator = generator.scan_path(dir);
    }
    if let Some(out_dir) = &settings.out_dir {
        generator = generator.output_dir(out_dir);
    }

    let outcomes = generator.run().context("Failed to generate field accessors")?;
    output.report(&settings.source_file, &outcomes)
}
