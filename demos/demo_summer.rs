use argot::{CommandLineParser, DynamicInstance, OptionConfig, ValueConfig};

fn main() {
    let parser = CommandLineParser::new("summer")
        .option(
            OptionConfig::new("Verbose")
                .short('v')
                .long("verbose")
                .switch(),
        )
        .value(ValueConfig::starting_at("Items", 0));
    let parsed = parser.run_env();

    if parsed.has_help_option() {
        println!("usage: summer [-h] [-v] ITEM [...]");
        return;
    }

    let root = parsed
        .instance(&[])
        .and_then(|instance| instance.downcast_ref::<DynamicInstance>())
        .expect("the root instance must be dynamic");
    let mut sum = 0;

    for item in root.strings("Items") {
        match item.parse::<u32>() {
            Ok(value) => sum += value,
            Err(error) => {
                eprintln!("Cannot sum '{item}': {error}");
                std::process::exit(1);
            }
        }
    }

    if root.get("Verbose").is_some() {
        println!("Items: {:?}", root.strings("Items"));
    }

    println!("Sum: {sum}");
}
