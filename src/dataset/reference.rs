use crate::models::{AddressRecord, RiskCategory};

pub const REFERENCE_SOURCE: &str = "reference";

/// Well-known mainnet wallets with an agreed ground-truth category.
const REFERENCE_WALLETS: &[(&str, &str, RiskCategory)] = &[
    // Exchanges and long-lived personal wallets
    ("Vitalik Buterin", "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045", RiskCategory::Established),
    ("Binance Hot Wallet 1", "0x28C6c06298d514Db089934071355E5743bf21d60", RiskCategory::Established),
    ("Binance Cold Wallet", "0x3f5CE5FBFe3E9af3971dD833D26bA9b5C936f0bE", RiskCategory::Established),
    ("Binance Hot Wallet 2", "0x47ac0Fb4F2D84898e4D9E7b4DaB3C24507a6D503", RiskCategory::Established),
    ("Coinbase Wallet", "0x71660c4005BA85c37ccec55d0C4493E66Fe775d3", RiskCategory::Established),
    // DeFi protocol contracts
    ("Uniswap V2 Router", "0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D", RiskCategory::DeFi),
    ("Uniswap V3 Router", "0xE592427A0AEce92De3Edee1F18E0157C05861564", RiskCategory::DeFi),
    ("Aave V2 Pool", "0x7d2768dE32b0b80b7a3454c06BdAc94A69DDc7A9", RiskCategory::DeFi),
    // Sanctioned mixers and known exploiters
    ("Tornado Cash (OFAC)", "0x8589427373D6D84E98730D7795D8f6f8731FDA16", RiskCategory::Bad),
    ("Tornado Cash (Contract)", "0x12D66f87A04A9E220743712Ce6d9bB1Ba5616C8a", RiskCategory::Bad),
    ("Tornado Cash (Relayer)", "0x910cbd523d972eb0a6f4cae4618ad62622b39dbf", RiskCategory::Bad),
    ("Ronin Bridge Hacker", "0x098B716B8Aaf21512996dC57EB0615e2383E2f96", RiskCategory::Bad),
    // Fresh wallet
    ("New User Example", "0x742d35Cc6634C0532925a3b8D4C9db96C4b4d8b6", RiskCategory::New),
    // Unusual addresses
    ("Burn Address", "0x000000000000000000000000000000000000dead", RiskCategory::EdgeCase),
    ("Null Address", "0x0000000000000000000000000000000000000000", RiskCategory::EdgeCase),
];

pub fn reference_wallets() -> Vec<AddressRecord> {
    REFERENCE_WALLETS
        .iter()
        .map(|(name, address, expected)| {
            AddressRecord::new(*address, *expected, REFERENCE_SOURCE).with_name(*name)
        })
        .collect()
}
