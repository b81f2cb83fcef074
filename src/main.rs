//! Entry point: connect to the robot and run the selected strategy.

use log::{error, info};

use wanderbot::driver::SimDriver;
use wanderbot::{Navigator, RobotDriver, Strategy, WallFollower, WanderConfig, WanderError};

/// Command-line options recognized by the binary
struct Options {
    config_path: Option<String>,
    profile: Option<String>,
    strategy: Option<Strategy>,
    cycles: Option<u64>,
    seed: Option<u64>,
}

fn parse_args() -> Result<Options, WanderError> {
    let mut options = Options {
        config_path: None,
        profile: None,
        strategy: None,
        cycles: None,
        seed: None,
    };

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        let mut value = |name: &str| {
            args.next()
                .ok_or_else(|| WanderError::Config(format!("{} needs a value", name)))
        };
        match arg.as_str() {
            "--config" => options.config_path = Some(value("--config")?),
            "--profile" => options.profile = Some(value("--profile")?),
            "--strategy" => {
                options.strategy = Some(match value("--strategy")?.as_str() {
                    "reactive" => Strategy::Reactive,
                    "wall-follow" => Strategy::WallFollow,
                    other => {
                        return Err(WanderError::Config(format!("unknown strategy '{}'", other)))
                    }
                })
            }
            "--cycles" => {
                let raw = value("--cycles")?;
                options.cycles = Some(
                    raw.parse()
                        .map_err(|_| WanderError::Config(format!("bad cycle count '{}'", raw)))?,
                )
            }
            "--seed" => {
                let raw = value("--seed")?;
                options.seed = Some(
                    raw.parse()
                        .map_err(|_| WanderError::Config(format!("bad seed '{}'", raw)))?,
                )
            }
            other => {
                return Err(WanderError::Config(format!(
                    "unrecognized argument '{}'",
                    other
                )))
            }
        }
    }
    Ok(options)
}

fn build_config(options: &Options) -> Result<WanderConfig, WanderError> {
    let mut config = match (&options.config_path, options.profile.as_deref()) {
        (Some(path), _) => WanderConfig::load(path)?,
        (None, Some("hardware")) => WanderConfig::hardware(),
        (None, Some("simulator")) | (None, None) => WanderConfig::simulator(),
        (None, Some(other)) => {
            return Err(WanderError::Config(format!("unknown profile '{}'", other)))
        }
    };
    if let Some(strategy) = options.strategy {
        config.strategy = strategy;
    }
    if let Some(seed) = options.seed {
        config.rng_seed = seed;
    }
    Ok(config)
}

fn run() -> Result<(), WanderError> {
    let options = parse_args()?;
    let config = build_config(&options)?;

    info!(
        "wanderbot starting, strategy {:?}, seed {}",
        config.strategy, config.rng_seed
    );

    // The only driver built in is the room simulator; a hardware
    // transport plugs in through the same RobotDriver trait.
    let mut driver = SimDriver::room(2.0, 2.0, config.rng_seed)
        .with_range_max(config.range_max)
        .with_rotation_bias(6.0);

    if !driver.connect() {
        return Err(WanderError::ConnectionFailed);
    }
    info!("connected to robot");
    driver.sleep_ms(config.settle_ms);

    // The driver handle stays scope-bound: every path out of this
    // function passes through a disconnect
    match config.strategy {
        Strategy::Reactive => {
            let mut navigator = Navigator::new(driver, &config);
            navigator.run(options.cycles);
            navigator.into_driver().disconnect();
        }
        Strategy::WallFollow => {
            let mut follower = WallFollower::new(driver, &config);
            follower.run(options.cycles);
            follower.into_driver().disconnect();
        }
    }

    info!("wanderbot finished");
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        error!("{}", e);
        eprintln!("wanderbot: {}", e);
        std::process::exit(1);
    }
}
