//! Solidity bindings for every contract the client reads from or writes to.
//!
//! Only the functions actually used are declared.

use alloy_sol_types::sol;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    struct LockedBalance {
        uint256 amount;
        uint256 end;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct Withdrawn {
        uint256 amount;
        uint256 penalty;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct PositionDetails {
        uint256 balance;
        uint256 depositAmount;
        uint256 withdrawable;
        uint256 penalty;
        uint256 unlockTime;
    }

    #[derive(Debug)]
    interface IVotingEscrow {
        function token() external view returns (address);
        function name() external view returns (string memory);
        function symbol() external view returns (string memory);
        function decimals() external view returns (uint8);
        function supply() external view returns (uint256);
        function reward_pool() external view returns (address);
        function modify_lock(uint256 amount, uint256 unlock_time, address user) external returns (LockedBalance memory);
        function withdraw() external returns (Withdrawn memory);
    }

    interface IPositionHelper {
        function getPositionDetails(address user) external view returns (PositionDetails memory);
    }

    interface IGauge {
        function asset() external view returns (address);
        function name() external view returns (string memory);
        function symbol() external view returns (string memory);
        function decimals() external view returns (uint8);
        function totalAssets() external view returns (uint256);
        function rewardRate() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function earned(address account) external view returns (uint256);
        function nextBoostedBalanceOf(address account) external view returns (uint256);
        function deposit(uint256 assets) external returns (uint256);
        function withdraw(uint256 assets, address receiver, address owner, bool claim) external returns (uint256);
        function getReward() external returns (bool);
    }

    interface IRewardPool {
        function claim(address user) external returns (uint256);
    }

    interface IClaimRewardsZap {
        function claim(address[] calldata gauges, bool lock, bool claim_ve_yfi) external;
    }

    interface IOptions {
        function discount() external view returns (uint256);
        function eth_required(uint256 amount) external view returns (uint256);
        function redeem(uint256 amount, address recipient) external payable returns (uint256);
    }

    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }

    interface IMulticall3 {
        struct Call3 {
            address target;
            bool allowFailure;
            bytes callData;
        }

        struct CallResult {
            bool success;
            bytes returnData;
        }

        function aggregate3(Call3[] calldata calls) external payable returns (CallResult[] memory returnData);
    }
}
