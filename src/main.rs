use anyhow::{bail, Context, Result};
use polyglot::{Config, FsStorage, LanguageSwitch, Polyglot};
use tracing::info;

/// Parsed command-line flags.
#[derive(Debug, Default)]
struct Args {
    set: Option<String>,
    restart: bool,
    text: Option<String>,
    key: Option<String>,
    audit: Option<String>,
}

impl Args {
    fn parse(args: &[String]) -> Result<Option<Self>> {
        let mut parsed = Self::default();
        let mut iter = args.iter().skip(1);

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--set" => parsed.set = Some(value(&mut iter, arg)?),
                "--restart" => parsed.restart = true,
                "--text" => parsed.text = Some(value(&mut iter, arg)?),
                "--key" => parsed.key = Some(value(&mut iter, arg)?),
                "--audit" => parsed.audit = Some(value(&mut iter, arg)?),
                "--help" | "-h" => return Ok(None),
                other => bail!("Unknown argument: {}", other),
            }
        }

        Ok(Some(parsed))
    }
}

fn value<'a>(iter: &mut impl Iterator<Item = &'a String>, flag: &str) -> Result<String> {
    iter.next()
        .cloned()
        .with_context(|| format!("{} requires a value", flag))
}

fn print_usage() {
    println!("Usage: polyglot [--set CODE] [--restart] [--text KEY] [--key KEY] [--audit REF]");
    println!();
    println!("Resolves the active language over POLY_DATA_DIR and POLY_ASSETS_DIR.");
    println!();
    println!("  --set CODE    switch to CODE (or its closest supported language)");
    println!("  --restart     with --set, request a restart instead of notifying");
    println!("  --text KEY    print KEY in the active language");
    println!("  --key KEY     print KEY in every supported language");
    println!("  --audit REF   compare every language's keys against REF");
}

fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("polyglot=info".parse()?),
        )
        .init();

    let raw: Vec<String> = std::env::args().collect();
    let Some(args) = Args::parse(&raw)? else {
        print_usage();
        return Ok(());
    };

    let config = Config::from_env()?;
    let storage = FsStorage::new(&config.data_dir, &config.assets_dir);
    let mut poly = Polyglot::new(storage, config);

    poly.on_language_change(|code, table| {
        info!("Language changed to {} ({} texts)", code, table.len());
    });

    if let Some(code) = &args.set {
        match poly
            .set_language(code, args.restart)
            .with_context(|| format!("Failed to set language {}", code))?
        {
            LanguageSwitch::Unchanged => println!("Language unchanged"),
            LanguageSwitch::Switched => println!("Language switched"),
            LanguageSwitch::RestartRequired => println!("Language switched, restart required"),
        }
    }

    println!(
        "Language: {} ({})",
        poly.language(),
        poly.lang_display_name().unwrap_or("unknown")
    );
    println!(
        "System language: {} ({})",
        poly.sys_lang_code().unwrap_or("unknown"),
        poly.sys_lang_name().unwrap_or("unknown")
    );
    println!("Supported: {}", poly.supported_languages().join(", "));
    println!("Using bundled assets: {}", poly.is_using_fallback());

    if let Some(key) = &args.text {
        println!("{}", poly.text(key));
    }

    if let Some(key) = &args.key {
        let found = poly.available_translations_for_key(key);
        println!("{}", serde_json::to_string_pretty(&found)?);
    }

    if let Some(reference) = &args.audit {
        let audit = poly
            .audit_translations(reference)
            .with_context(|| format!("Failed to load reference language {}", reference))?;
        for (code, report) in &audit {
            println!("{}: {}", code, serde_json::to_string_pretty(report)?);
        }
    }

    info!("Metrics: {}", serde_json::to_string(&poly.metrics())?);
    Ok(())
}
