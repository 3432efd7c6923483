use {
    crate::config::{Config, GlobalOptions},
    alloy_primitives::Address,
    anyhow::Result,
    dirs::home_dir,
    serde::{Deserialize, Serialize},
    std::{fs, path::PathBuf, sync::Arc, time::Duration},
    thiserror::Error,
    veyfi_client::prelude::*,
};

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Profiles not configured, run `veyfi profile create`")]
    NotConfigured,
    #[error("Profile {0} does not exist")]
    NotFound(String),
    #[error("$HOME not set")]
    NoHome,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub rpc_url: String,
    pub account: Option<Address>,
    pub receipt_timeout_secs: Option<u64>,
    pub claim_rewards_zap: Option<Address>,
}

#[derive(Serialize, Deserialize)]
pub struct CliConfig {
    pub profile_name: String,
}

impl Profile {
    pub fn new(
        name: String,
        rpc_url: String,
        account: Option<Address>,
        receipt_timeout_secs: Option<u64>,
        claim_rewards_zap: Option<Address>,
    ) -> Self {
        Profile {
            name,
            rpc_url,
            account,
            receipt_timeout_secs,
            claim_rewards_zap,
        }
    }

    pub fn deployment(&self) -> Deployment {
        Deployment {
            claim_rewards_zap: self.claim_rewards_zap,
            ..Deployment::default()
        }
    }

    pub fn settings(&self) -> ClientSettings {
        let defaults = ClientSettings::default();
        ClientSettings {
            receipt_timeout: self
                .receipt_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.receipt_timeout),
            ..defaults
        }
    }

    pub fn get_config(&self, global_options: Option<&GlobalOptions>) -> Config {
        let dry_run = match global_options {
            Some(options) => options.dry_run,
            None => false,
        };

        Config {
            deployment: self.deployment(),
            client: Arc::new(HttpChainClient::new(self.rpc_url.clone())),
            account: self.account,
            settings: self.settings(),
            dry_run,
        }
    }

    pub fn config(
        &mut self,
        rpc_url: Option<String>,
        account: Option<Address>,
        receipt_timeout_secs: Option<u64>,
        claim_rewards_zap: Option<Address>,
    ) -> Result<()> {
        if let Some(rpc_url) = rpc_url {
            self.rpc_url = rpc_url;
        }

        if let Some(account) = account {
            self.account = Some(account);
        }

        if let Some(receipt_timeout_secs) = receipt_timeout_secs {
            self.receipt_timeout_secs = Some(receipt_timeout_secs);
        }

        if let Some(zap) = claim_rewards_zap {
            self.claim_rewards_zap = Some(zap);
        }

        self.write_to_file()?;

        Ok(())
    }

    pub fn write_to_file(&self) -> Result<()> {
        let cli_profiles_dir = get_cli_config_dir()?.join("profiles");
        let profile_file = cli_profiles_dir.join(self.name.clone() + ".json");

        fs::write(profile_file, serde_json::to_string(&self)?)?;

        Ok(())
    }
}

pub fn load_profile() -> Result<Profile> {
    let cli_config_dir = get_cli_config_dir()?;
    let cli_config_file = cli_config_dir.join("config.json");

    if !cli_config_file.exists() {
        return Err(ProfileError::NotConfigured.into());
    }

    let cli_config = fs::read_to_string(&cli_config_file)?;
    let cli_config: CliConfig = serde_json::from_str(&cli_config)?;

    load_profile_by_name(&cli_config.profile_name)
}

pub fn load_profile_by_name(name: &str) -> Result<Profile> {
    let profile_file = get_cli_config_dir()?
        .join("profiles")
        .join(format!("{name}.json"));

    if !profile_file.exists() {
        return Err(ProfileError::NotFound(name.to_string()).into());
    }

    let profile = fs::read_to_string(&profile_file)?;
    let profile: Profile = serde_json::from_str(&profile)?;

    Ok(profile)
}

pub fn get_cli_config_dir() -> Result<PathBuf, ProfileError> {
    Ok(home_dir()
        .ok_or(ProfileError::NoHome)?
        .as_path()
        .join(".config/veyfi-cli"))
}

fn or_none(value: Option<impl ToString>) -> String {
    value
        .map(|x| x.to_string())
        .unwrap_or_else(|| "None".to_owned())
}

impl std::fmt::Debug for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let deployment = self.deployment();
        write!(
            f,
            r#"
Profile:
    Name: {}
    Rpc URL: {}
    Account: {}
    Chain ID: {}
    veYFI: {}
    Claim Rewards Zap: {}
    Receipt Timeout: {}s
        "#,
            self.name,
            self.rpc_url,
            or_none(self.account),
            deployment.chain_id,
            deployment.voting_escrow,
            or_none(self.claim_rewards_zap),
            self.settings().receipt_timeout.as_secs(),
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use pretty_assertions::assert_eq;

    #[test]
    fn profile_round_trips_through_json() {
        let profile = Profile::new(
            "main".to_string(),
            "http://localhost:1248".to_string(),
            Some(address!("00000000000000000000000000000000000000aa")),
            None,
            None,
        );

        let json = serde_json::to_string(&profile).unwrap();
        let loaded: Profile = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, profile);
    }

    #[test]
    fn settings_use_profile_timeout() {
        let mut profile = Profile::new(
            "main".to_string(),
            "http://localhost:1248".to_string(),
            None,
            Some(30),
            None,
        );
        assert_eq!(profile.settings().receipt_timeout, Duration::from_secs(30));

        profile.receipt_timeout_secs = None;
        assert_eq!(
            profile.settings().receipt_timeout,
            ClientSettings::default().receipt_timeout
        );
    }

    #[test]
    fn deployment_carries_zap() {
        let zap = address!("00000000000000000000000000000000000000fe");
        let profile = Profile::new(
            "main".to_string(),
            "http://localhost:1248".to_string(),
            None,
            None,
            Some(zap),
        );
        assert_eq!(profile.deployment().claim_rewards_zap, Some(zap));
        assert_eq!(profile.get_config(None).get_tx_mode(), TxMode::Normal);
    }
}
