use argot::{
    Command, CommandLineParser, Instance, OptionConfig, ValueConfig, ValueCountRange, ValueEnum,
};

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
enum Format {
    Json,
    #[argot(name = "yml")]
    Yaml,
}

#[derive(Debug, Default, Instance)]
struct Root {
    #[argot(name = "Verbose")]
    verbose: u8,
}

#[derive(Debug, Default, Instance)]
#[argot(type_name = "Export")]
struct ExportArgs {
    #[argot(name = "Format")]
    format: Option<Format>,
    #[argot(name = "Limit")]
    limit: Option<usize>,
    #[argot(name = "Paths")]
    paths: Vec<String>,
}

fn main() {
    let parser = CommandLineParser::new("exporter")
        .option(OptionConfig::new("Verbose").short('v').counter())
        .command(
            Command::new("export")
                .alias("x")
                .option(
                    OptionConfig::new("Format")
                        .short('f')
                        .long("format")
                        .values(ValueCountRange::exactly(1)),
                )
                .option(
                    OptionConfig::new("Limit")
                        .long("limit")
                        .values(ValueCountRange::exactly(1)),
                )
                .value(ValueConfig::starting_at("Paths", 0))
                .instance(|| Box::<ExportArgs>::default()),
        );
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut root = Root::default();
    let parsed = match parser.run_into(&args, &mut root) {
        Ok(parsed) => parsed,
        Err(exit_code) => std::process::exit(exit_code),
    };

    if parsed.has_help_option() {
        println!("usage: exporter [-h] [-v ...] export [-f FORMAT] [--limit N] PATH [...]");
        return;
    }

    println!("verbosity: {}", root.verbose);

    if let Some(export) = parsed
        .instance(&["export"])
        .and_then(|instance| instance.downcast_ref::<ExportArgs>())
    {
        println!("{export:?}");
    }
}
