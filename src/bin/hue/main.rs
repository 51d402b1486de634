mod cli;
mod error;
mod store;

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use hue_lights_rs::{
    ApiResponse, Bridge, BridgeConfig, Brightness, ColorTemp, LightControl, Payload, Saturation,
    Target,
};
use log::{debug, warn};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, Kind, SetArgs, SetKind};
use crate::error::CliError;
use crate::store::ConfigStore;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.global.debug);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let path = cli
        .global
        .config_file_path
        .clone()
        .unwrap_or_else(ConfigStore::default_path);
    let mut store = ConfigStore::load(&path)?;

    let mut config = match (&cli.global.host, store.first()) {
        (Some(host), _) => {
            let config = BridgeConfig::new(host);
            match store.username(host) {
                Some(username) => config.with_username(username),
                None => config,
            }
        }
        (None, Some((address, username))) => {
            println!("Using saved connection to bridge at {address}");
            BridgeConfig::new(address).with_username(username)
        }
        (None, None) => return Err(CliError::NoBridge),
    };
    let timeout = Duration::try_from_secs_f64(cli.global.timeout).map_err(|_| {
        CliError::InvalidArgument {
            flag: "timeout",
            value: cli.global.timeout.to_string(),
        }
    })?;
    config = config.with_app("hue_lights_rs", "hue-cli").with_timeout(timeout);

    let mut bridge = Bridge::new(config)?;
    if !bridge.is_registered() {
        register(&mut bridge, &mut store, &path)?;
    }

    match cli.command {
        Command::Register => {
            println!("Registered with bridge at {}", bridge.address());
            Ok(())
        }
        Command::List { kind } => list(&bridge, kind),
        Command::Get {
            kind,
            target,
            attribute,
        } => {
            let value = bridge.get(kind.category(), target, attribute.as_deref())?;
            print_json(&value);
            Ok(())
        }
        Command::Set(args) => set(&bridge, &args),
        Command::Diag => {
            let mut diag = bridge.diagnostics();
            diag["info"] = serde_json::to_value(bridge.info()?).unwrap_or(Value::Null);
            print_json(&diag);
            Ok(())
        }
    }
}

/// Register, asking the user to press the link button until it works.
fn register(bridge: &mut Bridge, store: &mut ConfigStore, path: &Path) -> Result<(), CliError> {
    println!("Connecting to bridge at {}...", bridge.address());
    let stdin = std::io::stdin();
    loop {
        match bridge.connect() {
            Ok(()) => break,
            Err(err) if err.is_link_button() => {
                println!("Link button not pressed. Press the link button on your bridge.");
                println!("Press Enter to try again...");
                let mut line = String::new();
                let read = stdin.lock().read_line(&mut line).map_err(|source| CliError::Io {
                    path: PathBuf::from("<stdin>"),
                    source,
                })?;
                if read == 0 {
                    return Err(err.into());
                }
            }
            Err(err) => return Err(err.into()),
        }
    }

    if let Some(username) = bridge.username() {
        store.set_username(bridge.address(), username);
        store.save(path)?;
    }
    println!("Successfully connected to the bridge!");
    Ok(())
}

fn list(bridge: &Bridge, kind: Kind) -> Result<(), CliError> {
    match kind {
        Kind::Light => {
            let lights = bridge.lights()?;
            println!("LIGHTS ({}):", lights.len());
            for light in lights {
                let status = if light.on()? { "ON" } else { "OFF" };
                println!("  {:>3}  {:<25} {}", light.id(), light.name()?, status);
            }
        }
        Kind::Group => {
            let groups = bridge.groups()?;
            println!("GROUPS ({}):", groups.len());
            for group in groups {
                println!("  {:>3}  {}", group.id(), group.name()?);
            }
        }
        Kind::Scene => {
            let scenes = bridge.scenes()?;
            println!("SCENES ({}):", scenes.len());
            for scene in scenes {
                println!("  {:<16} {}", scene.id(), scene.name()?);
            }
        }
        Kind::Sensor => {
            let sensors = bridge.sensors()?;
            println!("SENSORS ({}):", sensors.len());
            for sensor in sensors {
                println!(
                    "  {:>3}  {:<25} {}",
                    sensor.id(),
                    sensor.name()?,
                    sensor.sensor_type()?
                );
            }
        }
    }
    Ok(())
}

fn set(bridge: &Bridge, args: &SetArgs) -> Result<(), CliError> {
    let payload = payload_from(args)?;
    debug!("{:?}", payload);

    let target = Target::from(args.target.as_str());
    let responses = match args.kind {
        SetKind::Light => bridge.apply_light(target, &payload)?,
        SetKind::Group => bridge.apply_group(target, &payload)?,
    };
    report(&responses)
}

fn payload_from(args: &SetArgs) -> Result<Payload, CliError> {
    let mut payload = Payload::new();
    if args.on {
        payload.on(true);
    }
    if args.off {
        payload.on(false);
    }
    if let Some(bri) = args.bri {
        let bri = Brightness::create(bri).ok_or_else(|| CliError::InvalidArgument {
            flag: "bri",
            value: bri.to_string(),
        })?;
        payload.brightness(&bri);
    }
    if let Some(hue) = args.hue {
        payload.hue(hue);
    }
    if let Some(sat) = args.sat {
        let sat = Saturation::create(sat).ok_or_else(|| CliError::InvalidArgument {
            flag: "sat",
            value: sat.to_string(),
        })?;
        payload.saturation(&sat);
    }
    if let Some(ct) = args.ct {
        let ct = ColorTemp::create(ct).ok_or_else(|| CliError::InvalidArgument {
            flag: "ct",
            value: ct.to_string(),
        })?;
        payload.color_temp(&ct);
    }
    if !payload.is_valid() {
        return Err(CliError::NothingToSet);
    }
    if let Some(transition) = args.transition {
        payload.transition(transition);
    }
    Ok(payload)
}

fn report(responses: &[ApiResponse]) -> Result<(), CliError> {
    let mut rejected = 0;
    for response in responses {
        for value in response.successes() {
            println!("{value}");
        }
        let mut errors = response.errors().peekable();
        if errors.peek().is_some() {
            rejected += 1;
        }
        for err in errors {
            warn!("{}: {}", err.address, err.description);
        }
    }
    if rejected > 0 {
        return Err(CliError::Rejected {
            count: rejected,
            total: responses.len(),
        });
    }
    Ok(())
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(_) => println!("{value}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> SetArgs {
        let mut full = vec!["hue", "set"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Command::Set(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_payload_from_flags() {
        let payload = payload_from(&args(&["light", "1", "--off", "--ct", "370", "--transition", "5"]))
            .unwrap();
        assert_eq!(
            Value::Object(payload.to_body().unwrap()),
            serde_json::json!({"on": false, "ct": 370, "transitiontime": 5})
        );
    }

    #[test]
    fn test_payload_rejects_out_of_range() {
        assert!(matches!(
            payload_from(&args(&["light", "1", "--bri", "0"])),
            Err(CliError::InvalidArgument { flag: "bri", .. })
        ));
    }

    #[test]
    fn test_payload_needs_an_attribute() {
        assert!(matches!(
            payload_from(&args(&["group", "Kitchen", "--transition", "5"])),
            Err(CliError::NothingToSet)
        ));
    }
}
