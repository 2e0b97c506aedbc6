use std::env;
use std::fs;
use std::process;

use pianola::{import_midi, resort, schedule_voices, Settings, Sheet};

const USAGE: &str = "\
Usage: pianola import <file.mid> [--merged] [--resort] [--settings <settings.yaml>]
       pianola resort <sheet.yaml> [--settings <settings.yaml>]
       pianola schedule <sheet.yaml> [--settings <settings.yaml>]";

/// Parsed command line
struct Options {
    command: String,
    input: String,
    merged: bool,
    resort: bool,
    settings: Option<String>,
}

fn usage_error(message: &str) -> ! {
    eprintln!("{}", message);
    eprintln!("{}", USAGE);
    process::exit(1);
}

fn parse_args(args: &[String]) -> Options {
    if args.len() < 3 {
        usage_error("Missing command or input file");
    }

    let mut options = Options {
        command: args[1].clone(),
        input: args[2].clone(),
        merged: false,
        resort: false,
        settings: None,
    };

    let mut rest = args[3..].iter();
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--merged" if options.command == "import" => options.merged = true,
            "--resort" if options.command == "import" => options.resort = true,
            "--settings" => match rest.next() {
                Some(path) => options.settings = Some(path.clone()),
                None => usage_error("--settings needs a file"),
            },
            other => usage_error(&format!("Unknown option '{}'", other)),
        }
    }

    options
}

fn read_text(path: &str) -> String {
    match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path, e);
            process::exit(1);
        }
    }
}

fn load_settings(path: Option<&str>) -> Settings {
    let content = path.map(read_text).unwrap_or_default();
    match Settings::from_yaml(&content) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error in settings: {}", e);
            process::exit(1);
        }
    }
}

fn load_sheet(path: &str) -> Sheet {
    match Sheet::from_yaml(&read_text(path)) {
        Ok(sheet) => sheet,
        Err(e) => {
            eprintln!("Error in '{}': {}", path, e);
            process::exit(1);
        }
    }
}

fn print_sheet(sheet: &Sheet) {
    match sheet.to_yaml() {
        Ok(yaml) => print!("{}", yaml),
        Err(e) => {
            eprintln!("Error writing sheet: {}", e);
            process::exit(1);
        }
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let options = parse_args(&args);
    let mut settings = load_settings(options.settings.as_deref());

    match options.command.as_str() {
        "import" => {
            let bytes = match fs::read(&options.input) {
                Ok(bytes) => bytes,
                Err(e) => {
                    eprintln!("Error reading file '{}': {}", options.input, e);
                    process::exit(1);
                }
            };

            if options.merged {
                settings.quantize.merged = true;
            }
            let mut voices = match import_midi(&bytes, &settings) {
                Ok(voices) => voices,
                Err(e) => {
                    eprintln!("Import error: {}", e);
                    process::exit(1);
                }
            };
            // Merged imports are already resorted
            if options.resort && !settings.quantize.merged {
                voices = resort(&voices, &settings.resolver);
            }

            print_sheet(&Sheet::new(voices));
        }
        "resort" => {
            let sheet = load_sheet(&options.input);
            let voices = resort(&sheet.voices(), &settings.resolver);
            print_sheet(&sheet.with_voices(voices));
        }
        "schedule" => {
            let sheet = load_sheet(&options.input);
            let notes = schedule_voices(&sheet.voices(), &settings.schedule);
            match serde_yaml::to_string(&notes) {
                Ok(yaml) => print!("{}", yaml),
                Err(e) => {
                    eprintln!("Error writing schedule: {}", e);
                    process::exit(1);
                }
            }
        }
        other => usage_error(&format!("Unknown command '{}'", other)),
    }
}
