use clap::Parser;
use clockface::{window, ClockRenderer, FontBook, WindowConfig};
use log::info;
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(name = "clockface", about = "Analog wall clock in a window")]
struct Args {
    /// Edge length of the clock in pixels
    #[arg(long, default_value_t = 300.0)]
    size: f64,

    #[arg(long)]
    minute_marks: bool,

    /// Arabic numerals instead of dots
    #[arg(long)]
    numbers: bool,

    /// Roman numerals (implies --numbers)
    #[arg(long)]
    roman: bool,

    #[arg(long)]
    label: Option<String>,

    /// Font family for the label only
    #[arg(long, requires = "label")]
    label_font: Option<String>,

    /// Regular font face as FAMILY=PATH, e.g. Arial=/usr/share/fonts/arial.ttf.
    /// Overrides the face found among the system fonts
    #[arg(long = "font", value_name = "FAMILY=PATH", value_parser = parse_font)]
    fonts: Vec<(String, PathBuf)>,

    /// Italic font face as FAMILY=PATH
    #[arg(long = "italic-font", value_name = "FAMILY=PATH", value_parser = parse_font)]
    italic_fonts: Vec<(String, PathBuf)>,

    #[arg(long, default_value = "Clock")]
    title: String,
}

fn parse_font(arg: &str) -> Result<(String, PathBuf), String> {
    match arg.split_once('=') {
        Some((family, path)) if !family.is_empty() && !path.is_empty() => {
            Ok((family.to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("expected FAMILY=PATH, got {arg:?}")),
    }
}

fn run(args: Args) -> clockface::Result<()> {
    let mut fonts = FontBook::system();
    for (family, path) in &args.fonts {
        fonts.load(family, false, path)?;
    }
    for (family, path) in &args.italic_fonts {
        fonts.load(family, true, path)?;
    }

    let mut renderer = ClockRenderer::new(args.size);
    if args.minute_marks {
        renderer = renderer.with_minute_marks();
    }
    if args.numbers {
        renderer = renderer.with_numbers();
    }
    if args.roman {
        renderer = renderer.with_roman_numerals();
    }
    if let Some(label) = args.label {
        renderer = renderer.with_label(label, args.label_font.as_deref());
    }

    info!("starting {}px clock", args.size);
    let window_config = WindowConfig::builder().title(args.title).build();
    window::run(renderer, window_config, fonts)
}

fn main() {
    env_logger::init();

    if let Err(err) = run(Args::parse()) {
        eprintln!("clockface: {err}");
        process::exit(1);
    }
}
