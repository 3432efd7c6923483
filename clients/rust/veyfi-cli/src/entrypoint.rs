use {
    crate::{
        config::{Config, GlobalOptions},
        processor,
        profile::{load_profile, Profile},
        utils::parse_address,
    },
    alloy_primitives::Address,
    anyhow::Result,
    clap::Parser,
    std::future::Future,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Parser)]
#[clap(version = VERSION)]
pub struct Opts {
    #[clap(flatten)]
    pub cfg_override: GlobalOptions,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Parser)]
pub enum Command {
    Profile {
        #[clap(subcommand)]
        subcmd: ProfileCommand,
    },
    /// Lock YFI for veYFI.
    Escrow {
        #[clap(subcommand)]
        subcmd: EscrowCommand,
    },
    Gauge {
        #[clap(subcommand)]
        subcmd: GaugeCommand,
    },
    Rewards {
        #[clap(subcommand)]
        subcmd: RewardsCommand,
    },
    /// Redeem dYFI for YFI.
    Option {
        #[clap(subcommand)]
        subcmd: OptionCommand,
    },
}

#[derive(Debug, Parser)]
pub enum ProfileCommand {
    Create {
        #[clap(long)]
        name: String,
        #[clap(long)]
        rpc_url: String,
        #[clap(long, value_parser = parse_address)]
        account: Option<Address>,
        #[clap(long)]
        receipt_timeout_secs: Option<u64>,
        #[clap(long, value_parser = parse_address)]
        claim_rewards_zap: Option<Address>,
    },
    Show,
    List,
    Set {
        name: String,
    },
    Update {
        name: String,
        #[clap(long)]
        rpc_url: Option<String>,
        #[clap(long, value_parser = parse_address)]
        account: Option<Address>,
        #[clap(long)]
        receipt_timeout_secs: Option<u64>,
        #[clap(long, value_parser = parse_address)]
        claim_rewards_zap: Option<Address>,
    },
}

#[derive(Debug, Parser)]
pub enum EscrowCommand {
    Get,
    Lock {
        #[clap(long = "amount")]
        ui_amount: String,
        #[clap(long)]
        weeks: u64,
    },
    Increase {
        #[clap(long = "amount")]
        ui_amount: String,
    },
    Extend {
        #[clap(long)]
        weeks: u64,
    },
    Withdraw {
        /// Exit before the unlock time, paying the penalty.
        #[clap(long)]
        locked: bool,
    },
}

#[derive(Debug, Parser)]
pub enum GaugeCommand {
    List,
    Positions,
    Stake {
        #[clap(value_parser = parse_address)]
        gauge: Address,
        #[clap(long = "amount")]
        ui_amount: String,
    },
    Unstake {
        #[clap(value_parser = parse_address)]
        gauge: Address,
        #[clap(long = "amount")]
        ui_amount: String,
    },
    Claim {
        #[clap(value_parser = parse_address)]
        gauge: Address,
    },
}

#[derive(Debug, Parser)]
pub enum RewardsCommand {
    Get,
    ClaimBoost,
    ClaimExit,
    /// Claim every gauge through the zap.
    ClaimAll {
        /// Lock the claimed dYFI rewards.
        #[clap(long)]
        lock: bool,
        /// Also claim the veYFI boost and exit rewards.
        #[clap(long)]
        claim_ve_yfi: bool,
    },
}

#[derive(Debug, Parser)]
pub enum OptionCommand {
    Get,
    Quote {
        #[clap(long = "amount")]
        ui_amount: String,
    },
    Redeem {
        #[clap(long = "amount")]
        ui_amount: String,
    },
}

pub fn entry(opts: Opts) -> Result<()> {
    env_logger::init();

    match opts.command {
        Command::Profile { subcmd } => profile(subcmd),
        Command::Escrow { subcmd } => escrow(subcmd, &opts.cfg_override),
        Command::Gauge { subcmd } => gauge(subcmd, &opts.cfg_override),
        Command::Rewards { subcmd } => rewards(subcmd, &opts.cfg_override),
        Command::Option { subcmd } => option(subcmd, &opts.cfg_override),
    }
}

fn block_on<F: Future<Output = Result<()>>>(future: F) -> Result<()> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(future)
}

fn profile(subcmd: ProfileCommand) -> Result<()> {
    match subcmd {
        ProfileCommand::Create {
            name,
            rpc_url,
            account,
            receipt_timeout_secs,
            claim_rewards_zap,
        } => processor::create_profile(
            name,
            rpc_url,
            account,
            receipt_timeout_secs,
            claim_rewards_zap,
        ),
        ProfileCommand::Show => processor::show_profile(),
        ProfileCommand::List => processor::list_profiles(),
        ProfileCommand::Set { name } => processor::set_profile(name),
        ProfileCommand::Update {
            name,
            rpc_url,
            account,
            receipt_timeout_secs,
            claim_rewards_zap,
        } => processor::configure_profile(
            name,
            rpc_url,
            account,
            receipt_timeout_secs,
            claim_rewards_zap,
        ),
    }
}

fn load_config(global_options: &GlobalOptions) -> Result<(Profile, Config)> {
    let profile = load_profile()?;
    let config = profile.get_config(Some(global_options));
    Ok((profile, config))
}

fn escrow(subcmd: EscrowCommand, global_options: &GlobalOptions) -> Result<()> {
    let (profile, config) = load_config(global_options)?;

    if !global_options.skip_confirmation {
        match subcmd {
            EscrowCommand::Get => (),
            _ => get_consent(&subcmd, &profile)?,
        }
    }

    block_on(async {
        match subcmd {
            EscrowCommand::Get => processor::escrow_get(&config).await,
            EscrowCommand::Lock { ui_amount, weeks } => {
                processor::escrow_lock(&config, &ui_amount, weeks).await
            }
            EscrowCommand::Increase { ui_amount } => {
                processor::escrow_increase(&config, &ui_amount).await
            }
            EscrowCommand::Extend { weeks } => processor::escrow_extend(&config, weeks).await,
            EscrowCommand::Withdraw { locked } => processor::escrow_withdraw(&config, locked).await,
        }
    })
}

fn gauge(subcmd: GaugeCommand, global_options: &GlobalOptions) -> Result<()> {
    let (profile, config) = load_config(global_options)?;

    if !global_options.skip_confirmation {
        match subcmd {
            GaugeCommand::List | GaugeCommand::Positions => (),
            _ => get_consent(&subcmd, &profile)?,
        }
    }

    block_on(async {
        match subcmd {
            GaugeCommand::List => processor::gauge_list(&config).await,
            GaugeCommand::Positions => processor::gauge_positions(&config).await,
            GaugeCommand::Stake { gauge, ui_amount } => {
                processor::gauge_stake(&config, gauge, &ui_amount).await
            }
            GaugeCommand::Unstake { gauge, ui_amount } => {
                processor::gauge_unstake(&config, gauge, &ui_amount).await
            }
            GaugeCommand::Claim { gauge } => processor::gauge_claim(&config, gauge).await,
        }
    })
}

fn rewards(subcmd: RewardsCommand, global_options: &GlobalOptions) -> Result<()> {
    let (profile, config) = load_config(global_options)?;

    if !global_options.skip_confirmation {
        match subcmd {
            RewardsCommand::Get => (),
            _ => get_consent(&subcmd, &profile)?,
        }
    }

    block_on(async {
        match subcmd {
            RewardsCommand::Get => processor::rewards_get(&config).await,
            RewardsCommand::ClaimBoost => processor::rewards_claim_boost(&config).await,
            RewardsCommand::ClaimExit => processor::rewards_claim_exit(&config).await,
            RewardsCommand::ClaimAll { lock, claim_ve_yfi } => {
                processor::rewards_claim_all(&config, lock, claim_ve_yfi).await
            }
        }
    })
}

fn option(subcmd: OptionCommand, global_options: &GlobalOptions) -> Result<()> {
    let (profile, config) = load_config(global_options)?;

    if !global_options.skip_confirmation {
        match subcmd {
            OptionCommand::Get | OptionCommand::Quote { .. } => (),
            OptionCommand::Redeem { .. } => get_consent(&subcmd, &profile)?,
        }
    }

    block_on(async {
        match subcmd {
            OptionCommand::Get => processor::option_get(&config).await,
            OptionCommand::Quote { ui_amount } => processor::option_quote(&config, &ui_amount).await,
            OptionCommand::Redeem { ui_amount } => {
                processor::option_redeem(&config, &ui_amount).await
            }
        }
    })
}

fn get_consent<T: std::fmt::Debug>(cmd: T, profile: &Profile) -> Result<()> {
    let mut input = String::new();
    println!("Command: {cmd:#?}");
    println!("{profile:#?}");
    println!(
        "Type the name of the profile [{}] to continue",
        profile.name.clone()
    );
    std::io::stdin().read_line(&mut input)?;
    if input.trim() != profile.name {
        println!("Aborting");
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Opts::command().debug_assert();
    }

    #[test]
    fn parses_write_commands() {
        let opts = Opts::try_parse_from([
            "veyfi",
            "-y",
            "gauge",
            "stake",
            "0x7Fd8Af959B54A677a1D8F92265Bd0714274C56a3",
            "--amount",
            "1.5",
        ])
        .unwrap();

        assert!(opts.cfg_override.skip_confirmation);
        match opts.command {
            Command::Gauge {
                subcmd: GaugeCommand::Stake { gauge, ui_amount },
            } => {
                assert_eq!(gauge, veyfitypecrate::constants::VE_YFI_GAUGES[0]);
                assert_eq!(ui_amount, "1.5");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_checksum() {
        let res = Opts::try_parse_from([
            "veyfi",
            "gauge",
            "claim",
            "0x7FD8Af959B54A677a1D8F92265Bd0714274C56a3",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn dry_run_is_global() {
        let opts = Opts::try_parse_from([
            "veyfi",
            "escrow",
            "lock",
            "--amount",
            "10",
            "--weeks",
            "52",
            "--dry-run",
        ])
        .unwrap();
        assert!(opts.cfg_override.dry_run);
    }
}
