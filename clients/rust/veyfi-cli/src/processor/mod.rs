mod escrow;
mod gauge;
mod option;
mod rewards;

pub use escrow::*;
pub use gauge::*;
pub use option::*;
pub use rewards::*;

use {
    crate::profile::{self, get_cli_config_dir, load_profile, CliConfig, Profile, ProfileError},
    alloy_primitives::Address,
    anyhow::Result,
    std::fs,
};

// --------------------------------------------------------------------------------------------------------------------
// Profile
// --------------------------------------------------------------------------------------------------------------------

pub fn create_profile(
    name: String,
    rpc_url: String,
    account: Option<Address>,
    receipt_timeout_secs: Option<u64>,
    claim_rewards_zap: Option<Address>,
) -> Result<()> {
    let cli_config_dir = get_cli_config_dir()?;
    let profile = Profile::new(name, rpc_url, account, receipt_timeout_secs, claim_rewards_zap);

    if !cli_config_dir.exists() {
        fs::create_dir_all(&cli_config_dir)?;

        let cli_config_file = cli_config_dir.join("config.json");

        fs::write(
            cli_config_file,
            serde_json::to_string(&CliConfig {
                profile_name: profile.name.clone(),
            })?,
        )?;
    }

    let cli_profiles_dir = cli_config_dir.join("profiles");

    if !cli_profiles_dir.exists() {
        fs::create_dir(&cli_profiles_dir)?;
    }

    if cli_profiles_dir
        .join(profile.name.clone() + ".json")
        .exists()
    {
        anyhow::bail!("Profile {} already exists", profile.name);
    }

    println!("Creating profile {profile:#?}");

    profile.write_to_file()?;

    Ok(())
}

pub fn show_profile() -> Result<()> {
    let profile = load_profile()?;
    println!("{profile:?}");
    Ok(())
}

pub fn set_profile(name: String) -> Result<()> {
    let cli_config_dir = get_cli_config_dir()?;
    let cli_config_file = cli_config_dir.join("config.json");

    if !cli_config_file.exists() {
        return Err(ProfileError::NotConfigured.into());
    }

    let profile_file = cli_config_dir.join("profiles").join(format!("{name}.json"));

    if !profile_file.exists() {
        return Err(ProfileError::NotFound(name).into());
    }

    let cli_config = fs::read_to_string(&cli_config_file)?;
    let mut cli_config: CliConfig = serde_json::from_str(&cli_config)?;

    cli_config.profile_name = name;

    fs::write(&cli_config_file, serde_json::to_string(&cli_config)?)?;

    Ok(())
}

pub fn list_profiles() -> Result<()> {
    let cli_config_dir = get_cli_config_dir()?;
    let cli_profiles_dir = cli_config_dir.join("profiles");

    if !cli_profiles_dir.exists() {
        return Err(ProfileError::NotConfigured.into());
    }

    let mut profiles = fs::read_dir(&cli_profiles_dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter_map(|file| file.strip_suffix(".json").map(str::to_string))
        .collect::<Vec<String>>();

    if profiles.is_empty() {
        println!("No profiles exist");
    }

    let cli_config = serde_json::from_str::<CliConfig>(&fs::read_to_string(
        cli_config_dir.join("config.json"),
    )?)?;

    println!("Current profile: {}", cli_config.profile_name);

    profiles.sort();

    println!("Found {} profiles", profiles.len());
    for profile in profiles {
        println!("{profile}");
    }

    Ok(())
}

pub fn configure_profile(
    name: String,
    rpc_url: Option<String>,
    account: Option<Address>,
    receipt_timeout_secs: Option<u64>,
    claim_rewards_zap: Option<Address>,
) -> Result<()> {
    let mut profile = profile::load_profile_by_name(&name)?;
    profile.config(rpc_url, account, receipt_timeout_secs, claim_rewards_zap)?;

    Ok(())
}
