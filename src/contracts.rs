//! Typed contract interfaces consumed by this crate.
//!
//! The payments contract interface is declared inline so the crate is
//! self-contained; only the functions and events this client actually calls are
//! listed. Struct and field names follow the on-chain ABI.

use alloy_sol_types::sol;

sol!(
    #[allow(missing_docs)]
    #[allow(clippy::too_many_arguments)]
    #[derive(Debug)]
    #[sol(rpc)]
    interface IPayments {
        struct RailView {
            address token;
            address from;
            address to;
            address operator;
            address validator;
            uint256 paymentRate;
            uint256 lockupPeriod;
            uint256 lockupFixed;
            uint256 settledUpTo;
            uint256 endEpoch;
            uint256 commissionRateBps;
            address serviceFeeRecipient;
        }

        struct RailInfo {
            uint256 railId;
            bool isTerminated;
            uint256 endEpoch;
        }

        function accounts(address token, address owner)
            external
            view
            returns (uint256 funds, uint256 lockupCurrent, uint256 lockupRate, uint256 lockupLastSettledAt);

        function operatorApprovals(address token, address client, address operator)
            external
            view
            returns (
                bool isApproved,
                uint256 rateAllowance,
                uint256 lockupAllowance,
                uint256 rateUsage,
                uint256 lockupUsage,
                uint256 maxLockupPeriod
            );

        function getRail(uint256 railId) external view returns (RailView memory);

        function getRailsForPayerAndToken(address payer, address token, uint256 offset, uint256 limit)
            external
            view
            returns (RailInfo[] memory);

        function getRailsForPayeeAndToken(address payee, address token, uint256 offset, uint256 limit)
            external
            view
            returns (RailInfo[] memory);

        function deposit(address token, address to, uint256 amount) external;

        function depositWithPermitAndApproveOperator(
            address token,
            address to,
            uint256 amount,
            uint256 deadline,
            uint8 v,
            bytes32 r,
            bytes32 s,
            address operator,
            uint256 rateAllowance,
            uint256 lockupAllowance,
            uint256 maxLockupPeriod
        ) external;

        function withdraw(address token, uint256 amount) external;

        function setOperatorApproval(
            address token,
            address operator,
            bool approved,
            uint256 rateAllowance,
            uint256 lockupAllowance,
            uint256 maxLockupPeriod
        ) external;

        function settleRail(uint256 railId, uint256 untilEpoch)
            external
            returns (
                uint256 totalSettledAmount,
                uint256 totalNetPayeeAmount,
                uint256 totalOperatorCommission,
                uint256 finalSettledEpoch,
                string memory note
            );

        function settleTerminatedRailWithoutValidation(uint256 railId)
            external
            returns (
                uint256 totalSettledAmount,
                uint256 totalNetPayeeAmount,
                uint256 totalOperatorCommission,
                uint256 finalSettledEpoch,
                string memory note
            );

        event DepositRecorded(address indexed token, address indexed from, address indexed to, uint256 amount);

        event WithdrawRecorded(address indexed token, address indexed from, address indexed to, uint256 amount);

        event RailSettled(
            uint256 indexed railId,
            uint256 totalSettledAmount,
            uint256 totalNetPayeeAmount,
            uint256 operatorCommission,
            uint256 networkFee,
            uint256 settledUpTo
        );

        event OperatorApprovalUpdated(
            address indexed token,
            address indexed client,
            address indexed operator,
            bool approved,
            uint256 rateAllowance,
            uint256 lockupAllowance,
            uint256 maxLockupPeriod
        );
    }
);

sol!(
    #[allow(missing_docs)]
    #[derive(Debug)]
    #[sol(rpc)]
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function decimals() external view returns (uint8);
        function name() external view returns (string memory);
        function version() external view returns (string memory);
        function nonces(address owner) external view returns (uint256);
    }
);

sol!(
    /// EIP-2612 permit message, signed off-chain to authorize the payments
    /// contract to pull the deposit amount without a separate `approve` call.
    #[derive(Debug)]
    struct Permit {
        address owner;
        address spender;
        uint256 value;
        uint256 nonce;
        uint256 deadline;
    }
);
