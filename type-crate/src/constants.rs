use alloy_primitives::{address, Address};

/// veYFI only lives on Ethereum mainnet.
pub const VEYFI_CHAIN_ID: u64 = 1;

pub const YFI_ADDRESS: Address = address!("0bc529c00C6401aEF6D220BE8C6Ea1667F6Ad93e");
pub const VEYFI_ADDRESS: Address = address!("90c1f9220d90d3966FbeE24045EDd73E1d588aD5");
pub const VEYFI_DYFI_ADDRESS: Address = address!("41252E8691e964f7DE35156B68493bAb6797a275");
pub const VEYFI_OPTIONS_ADDRESS: Address = address!("7dC3A74F0684fc026f9163C6D5c3C99fda2cf60a");
pub const VEYFI_POSITION_HELPER_ADDRESS: Address =
    address!("5A70cD937bA3Daec8188E937E243fFa43d6ECbe8");
/// Pays out YFI penalties collected from early exits.
pub const VEYFI_YFI_REWARD_POOL: Address = address!("b287a1964AEE422911c7b8409f5E5A273c1412fA");
/// Pays out dYFI clawed back from gauge stakers without a max boost.
pub const VEYFI_DYFI_REWARD_POOL: Address = address!("2391Fc8f5E417526338F5aa3968b1851C16D894E");
/// Canonical Multicall3 deployment, same address on every EVM chain.
pub const MULTICALL3_ADDRESS: Address = address!("cA11bde05977b3631167028862bE2a173976CA11");

pub const VE_YFI_GAUGES: [Address; 8] = [
    address!("7Fd8Af959B54A677a1D8F92265Bd0714274C56a3"), // YFI/ETH yVault
    address!("28da6dE3e804bDdF0aD237CFA6048f2930D0b4Dc"), // dYFI/ETH yVault
    address!("107717C98C8125A94D3d2Cc82b86a1b705f3A27C"), // yCRV/CRV yVault
    address!("81d93531720d86f0491DeE7D03f30b3b5aC24e59"), // yETH/ETH yVault
    address!("6130E6cD924a40b24703407F246966D7435D4998"), // yPrisma/Prisma yVault
    address!("622fA41799406B120f9a40dA843D358b7b2CFEE3"), // yvUSDC-1
    address!("128e72DfD8b00cbF9d12cB75E846AC87B83DdFc9"), // yvDAI-1
    address!("5943F7090282Eb66575662EADf7C60a717a7cE4D"), // yvWETH-1
];

/// Gauges deployed for v3 vaults. Their `rewardRate` carries 36 decimals instead of 18.
pub const VE_YFI_GAUGES_V2: [Address; 3] = [
    address!("622fA41799406B120f9a40dA843D358b7b2CFEE3"),
    address!("128e72DfD8b00cbF9d12cB75E846AC87B83DdFc9"),
    address!("5943F7090282Eb66575662EADf7C60a717a7cE4D"),
];

pub const GAUGE_REWARD_DECIMALS: u8 = 18;
pub const GAUGE_V2_REWARD_DECIMALS: u8 = 36;

/// YFI, dYFI and veYFI all use 18 decimals.
pub const YFI_DECIMALS: u8 = 18;
/// The option discount is an 18 decimals ratio.
pub const DISCOUNT_DECIMALS: u8 = 18;

pub const MS_PER_SECOND: u64 = 1_000;
pub const DAY_SECONDS: u64 = 24 * 60 * 60;
pub const WEEK_SECONDS: u64 = 7 * DAY_SECONDS;
pub const WEEK_MS: u64 = WEEK_SECONDS * MS_PER_SECOND;
pub const YEAR_SECONDS: u64 = 365 * DAY_SECONDS;

/// Longest lock accepted by the escrow: four years, rounded down to a whole week (208 weeks).
pub const MAX_LOCK: u64 = (4 * YEAR_SECONDS / WEEK_SECONDS) * WEEK_SECONDS;
pub const MIN_LOCK_TIME_WEEKS: u64 = 1;
pub const MAX_LOCK_TIME_WEEKS: u64 = MAX_LOCK / WEEK_SECONDS;

/// How long a refused unlocked-withdraw keeps its error status before going back to idle.
pub const WITHDRAW_PENALTY_STATUS_RESET_MS: u64 = 3_000;
