mod error_formatter;
mod formatter;
mod interactive;
mod mcp;
mod server;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use formatter::Formatter;
use optik::{
    Engine, EyeForm, FormData, FrameForm, LensType, PrescriptionForm, PriorityForm,
    PriorityPreset, RuleTables,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "optik")]
#[command(about = "Lens thickness, index and price advisor for optical retail.")]
#[command(
    long_about = "Optik estimates lens thickness from a prescription, suggests lens materials and coatings, and prices up to three ranked lens packages.\nThe CLI quotes from the command line, runs Optik as an HTTP server, or serves AI tools via MCP."
)]
#[command(version)]
struct Cli {
    /// Rule tables JSON file; sections left out keep their built-in defaults
    #[arg(short = 'c', long = "config", global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price and rank lens packages for a prescription
    ///
    /// Validates the calculator form, estimates thickness for every candidate index,
    /// and prints up to three recommendations. Lenses that need special manufacture
    /// are listed separately with their delivery time.
    Quote {
        #[command(flatten)]
        form: FormArgs,
        /// Read the calculator form from a JSON file instead of flags
        #[arg(long, value_name = "FILE", conflicts_with = "interactive")]
        input: Option<PathBuf>,
        /// Ask for every field interactively
        #[arg(short = 'i', long)]
        interactive: bool,
        /// Print the quote as JSON
        #[arg(long)]
        json: bool,
    },
    /// Estimate center and edge thickness of one lens
    Thickness {
        /// Lens power in diopters (negative for myopia)
        #[arg(allow_negative_numbers = true)]
        power: f64,
        /// Refractive index
        #[arg(long, default_value = "1.5")]
        index: f64,
        /// Effective lens diameter in mm
        #[arg(long, default_value = "52")]
        diameter: f64,
        /// Minimum glass thickness in mm
        #[arg(long)]
        min_thickness: Option<f64>,
        /// Print the estimate as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show how much thinner an index is than a 1.50 lens
    Improvement {
        /// Lens power in diopters
        #[arg(allow_negative_numbers = true)]
        power: f64,
        /// Refractive index to compare
        #[arg(long)]
        index: f64,
        /// Effective lens diameter in mm
        #[arg(long, default_value = "52")]
        diameter: f64,
    },
    /// Suggest a lens index for a total diopter value
    Index {
        /// Total diopter value
        #[arg(allow_negative_numbers = true)]
        diopter: f64,
        /// Priority preset: thin, cheap or balanced
        #[arg(short, long, default_value = "balanced")]
        priority: String,
    },
    /// Suggest coatings for a free-text usage description
    ///
    /// Examples:
    ///   optik coatings "ofiste bilgisayar"
    ///   optik coatings "gece araba" --lens-type progressive
    Coatings {
        /// How the glasses will be used
        usage: String,
        /// Lens design
        #[arg(long, default_value = "single_vision")]
        lens_type: String,
    },
    /// Show the active rule tables
    Rules {
        /// Print the tables as JSON, ready to edit and pass back with --config
        #[arg(long)]
        json: bool,
    },
    /// Start HTTP REST API server (default: localhost:3000)
    ///
    /// API: GET /thickness, GET /improvement, POST /quote, POST /recommendations,
    /// GET and PUT /rules
    Server {
        /// Host address to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port number to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
    /// Start MCP server for AI assistant integration (stdio)
    Mcp,
}

#[derive(Args)]
struct FormArgs {
    /// Right eye sphere (SPH)
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    right_sph: f64,
    /// Right eye cylinder (CYL)
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    right_cyl: f64,
    /// Right eye axis in degrees
    #[arg(long, default_value = "0")]
    right_axis: f64,
    /// Left eye sphere (SPH)
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    left_sph: f64,
    /// Left eye cylinder (CYL)
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    left_cyl: f64,
    /// Left eye axis in degrees
    #[arg(long, default_value = "0")]
    left_axis: f64,
    /// Frame size: small, medium or large
    #[arg(long, default_value = "medium")]
    frame: String,
    /// Lens design, e.g. single_vision, progressive
    #[arg(long, default_value = "single_vision")]
    lens_type: String,
    /// How much thin lenses matter (0-100)
    #[arg(long, default_value = "50")]
    thickness_priority: f64,
    /// How much a low price matters (0-100)
    #[arg(long, default_value = "50")]
    price_priority: f64,
    /// How much quality matters (0-100)
    #[arg(long, default_value = "50")]
    quality_priority: f64,
    /// How the glasses will be used, free text
    #[arg(long, default_value = "")]
    usage: String,
    /// Customer is eligible for the insurance subsidy
    #[arg(long)]
    subsidy: bool,
}

impl FormArgs {
    fn to_form(&self) -> FormData {
        FormData {
            prescription: PrescriptionForm {
                right_eye: EyeForm {
                    sph: self.right_sph,
                    cyl: self.right_cyl,
                    axis: self.right_axis,
                },
                left_eye: EyeForm {
                    sph: self.left_sph,
                    cyl: self.left_cyl,
                    axis: self.left_axis,
                },
            },
            frame: FrameForm {
                size: self.frame.clone(),
                width: None,
                height: None,
                bridge: None,
            },
            lens_type: self.lens_type.clone(),
            priority: PriorityForm {
                thickness: self.thickness_priority,
                price: self.price_priority,
                quality: self.quality_priority,
            },
            usage: self.usage.clone(),
            subsidy_eligible: self.subsidy,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result = match &cli.command {
        Commands::Quote {
            form,
            input,
            interactive,
            json,
        } => quote_command(config, form, input.as_deref(), *interactive, *json),
        Commands::Thickness {
            power,
            index,
            diameter,
            min_thickness,
            json,
        } => thickness_command(config, *power, *index, *diameter, *min_thickness, *json),
        Commands::Improvement {
            power,
            index,
            diameter,
        } => improvement_command(config, *power, *index, *diameter),
        Commands::Index { diopter, priority } => index_command(config, *diopter, priority),
        Commands::Coatings { usage, lens_type } => coatings_command(config, usage, lens_type),
        Commands::Rules { json } => rules_command(config, *json),
        Commands::Server { host, port } => server_command(config, host, *port),
        Commands::Mcp => mcp_command(config),
    };

    if let Err(e) = result {
        if let Some(optik_err) = e.downcast_ref::<optik::OptikError>() {
            eprintln!("{}", error_formatter::format_error(optik_err));
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

fn quote_command(
    config: Option<&Path>,
    form: &FormArgs,
    input: Option<&Path>,
    interactive: bool,
    json: bool,
) -> Result<()> {
    let engine = load_engine(config)?;

    let form = if interactive {
        interactive::prompt_form(engine.limits())?
    } else if let Some(path) = input {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read form file {}", path.display()))?;
        FormData::from_json(&text)?
    } else {
        form.to_form()
    };

    let quote = engine.quote(&form)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&quote)?);
    } else {
        let formatter = Formatter::default();
        print!(
            "{}",
            formatter.format_quote(&quote, chrono::Local::now().date_naive())
        );
    }

    Ok(())
}

fn thickness_command(
    config: Option<&Path>,
    power: f64,
    index: f64,
    diameter: f64,
    min_thickness: Option<f64>,
    json: bool,
) -> Result<()> {
    let engine = load_engine(config)?;
    let result = engine.estimate_thickness(power, index, diameter, min_thickness)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        let formatter = Formatter::default();
        print!("{}", formatter.format_thickness(power, index, &result));
    }

    Ok(())
}

fn improvement_command(
    config: Option<&Path>,
    power: f64,
    index: f64,
    diameter: f64,
) -> Result<()> {
    let engine = load_engine(config)?;
    let percent = engine.estimate_improvement_percent(power, index, diameter)?;

    let formatter = Formatter::default();
    print!("{}", formatter.format_improvement(power, index, percent));

    Ok(())
}

fn index_command(config: Option<&Path>, diopter: f64, priority: &str) -> Result<()> {
    let engine = load_engine(config)?;
    let preset: PriorityPreset = priority.parse()?;
    let suggestion = engine.recommend_index(diopter, preset)?;

    let formatter = Formatter::default();
    print!("{}", formatter.format_index(diopter, &suggestion));

    Ok(())
}

fn coatings_command(config: Option<&Path>, usage: &str, lens_type: &str) -> Result<()> {
    let engine = load_engine(config)?;
    let lens_type: LensType = lens_type.parse()?;
    let coatings = engine.recommend_coatings(usage, lens_type)?;

    let formatter = Formatter::default();
    print!("{}", formatter.format_coatings(&coatings, engine.tables()));

    Ok(())
}

fn rules_command(config: Option<&Path>, json: bool) -> Result<()> {
    let engine = load_engine(config)?;

    if json {
        println!("{}", engine.tables().to_json_pretty()?);
    } else {
        let formatter = Formatter::default();
        print!("{}", formatter.format_rules(engine.tables()));
    }

    Ok(())
}

fn server_command(config: Option<&Path>, host: &str, port: u16) -> Result<()> {
    #[cfg(feature = "server")]
    {
        use tokio::runtime::Runtime;
        let rt = Runtime::new()?;
        rt.block_on(async {
            let engine = load_engine(config)?;

            println!(
                "Starting HTTP server with {} index rule(s) and {} coating scenario(s)",
                engine.tables().index_rules.len(),
                engine.tables().coating_rules.len()
            );
            server::http::start_server(engine, host, port).await
        })?;
    }

    #[cfg(not(feature = "server"))]
    {
        let _ = (config, host, port);
        eprintln!("Error: Server feature not enabled");
        eprintln!("Recompile with: cargo build --features server");
        std::process::exit(1);
    }

    Ok(())
}

fn mcp_command(config: Option<&Path>) -> Result<()> {
    #[cfg(feature = "mcp")]
    {
        let engine = load_engine(config)?;
        mcp::server::start_server(engine)?;
    }

    #[cfg(not(feature = "mcp"))]
    {
        let _ = config;
        eprintln!("Error: MCP feature not enabled");
        eprintln!("Recompile with: cargo build --features mcp");
        std::process::exit(1);
    }

    Ok(())
}

/// Build an engine from the built-in tables, or from a rule tables file
fn load_engine(config: Option<&Path>) -> Result<Engine> {
    let Some(path) = config else {
        return Ok(Engine::new());
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let source_id = path.to_string_lossy().to_string();
    let tables = RuleTables::from_json(&text, &source_id)?;
    Ok(Engine::with_tables(tables)?)
}
