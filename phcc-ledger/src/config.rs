use phcc_he::cryptosystems::integer_el_gamal::ElGamalParameters;
use phcc_he::cryptosystems::paillier::PaillierParameters;
use rug::Integer;
use serde::{Deserialize, Serialize};

/// Size of the RSA key protecting the operation log when the configuration does not name one.
pub const DEFAULT_LOG_KEY_BITS: usize = 2048;

fn default_log_key_bits() -> usize {
    DEFAULT_LOG_KEY_BITS
}

/// Everything a ledger's key generation depends on. None of these parameters have built-in
/// defaults except the log key size; production deployments must supply large, prime parameters.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct LedgerConfig {
    /// Group of the multiplicative scheme.
    pub el_gamal: ElGamalParameters,
    /// Fixed ElGamal secret exponent for reproducible setups. Sampled when absent.
    #[serde(default)]
    pub el_gamal_secret: Option<Integer>,
    /// Secret factors of the additive scheme's modulus.
    pub paillier: PaillierParameters,
    /// Bit length of the RSA key that encrypts the operation log.
    #[serde(default = "default_log_key_bits")]
    pub log_key_bits: usize,
}

impl LedgerConfig {
    /// A configuration with a sampled ElGamal secret and the default log key size.
    pub fn new(el_gamal: ElGamalParameters, paillier: PaillierParameters) -> Self {
        LedgerConfig {
            el_gamal,
            el_gamal_secret: None,
            paillier,
            log_key_bits: DEFAULT_LOG_KEY_BITS,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{LedgerConfig, DEFAULT_LOG_KEY_BITS};
    use phcc_he::cryptosystems::integer_el_gamal::ElGamalParameters;
    use phcc_he::cryptosystems::paillier::PaillierParameters;
    use rug::Integer;

    #[test]
    fn test_config_survives_serialization() {
        let mut config = LedgerConfig::new(
            ElGamalParameters::rfc5114_1024().unwrap(),
            PaillierParameters {
                p: Integer::from(17),
                q: Integer::from(13),
            },
        );
        config.el_gamal_secret = Some(Integer::from(42));
        assert_eq!(DEFAULT_LOG_KEY_BITS, config.log_key_bits);

        let bytes = bincode::serialize(&config).unwrap();
        let decoded: LedgerConfig = bincode::deserialize(&bytes).unwrap();

        assert_eq!(config, decoded);
    }
}
