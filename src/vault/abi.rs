//! Vault contract calls and events, encoded by hand against the Solidity ABI.

use alloy_primitives::{keccak256, Address, Bytes, B256};
use num_bigint::BigUint;

use crate::error::{AppError, AppResult};

pub const CHEQUE_CASHED_EVENT: &str = "ChequeCashed";
pub const CHEQUE_BOUNCED_EVENT: &str = "ChequeBounced";

const CHEQUE_CASHED_SIGNATURE: &str =
    "ChequeCashed(address,address,address,uint256,uint256,uint256)";
const CHEQUE_BOUNCED_SIGNATURE: &str = "ChequeBounced()";
const PAID_OUT_SIGNATURE: &str = "paidOut(address)";
const CASH_CHEQUE_BENEFICIARY_SIGNATURE: &str = "cashChequeBeneficiary(address,uint256,bytes)";

const WORD: usize = 32;

fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature);
    [hash[0], hash[1], hash[2], hash[3]]
}

/// topic[0] of `ChequeCashed`
pub fn cheque_cashed_topic() -> B256 {
    keccak256(CHEQUE_CASHED_SIGNATURE)
}

/// topic[0] of `ChequeBounced`
pub fn cheque_bounced_topic() -> B256 {
    keccak256(CHEQUE_BOUNCED_SIGNATURE)
}

fn address_word(address: Address) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 20..].copy_from_slice(address.as_slice());
    word
}

fn uint_word(value: &BigUint) -> AppResult<[u8; WORD]> {
    let bytes = value.to_bytes_be();
    if bytes.len() > WORD {
        return Err(AppError::AbiDecode(format!(
            "value {} does not fit in uint256",
            value
        )));
    }
    let mut word = [0u8; WORD];
    word[WORD - bytes.len()..].copy_from_slice(&bytes);
    Ok(word)
}

fn usize_word(value: usize) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&(value as u64).to_be_bytes());
    word
}

/// Calldata for `paidOut(beneficiary)`
pub fn encode_paid_out(beneficiary: Address) -> Bytes {
    let mut data = Vec::with_capacity(4 + WORD);
    data.extend_from_slice(&selector(PAID_OUT_SIGNATURE));
    data.extend_from_slice(&address_word(beneficiary));
    data.into()
}

/// Calldata for `cashChequeBeneficiary(recipient, cumulativePayout, signature)`
pub fn encode_cash_cheque_beneficiary(
    recipient: Address,
    cumulative_payout: &BigUint,
    signature: &[u8],
) -> AppResult<Bytes> {
    let padded_len = signature.len().div_ceil(WORD) * WORD;
    let mut data = Vec::with_capacity(4 + 4 * WORD + padded_len);

    data.extend_from_slice(&selector(CASH_CHEQUE_BENEFICIARY_SIGNATURE));
    data.extend_from_slice(&address_word(recipient));
    data.extend_from_slice(&uint_word(cumulative_payout)?);
    // head is three words, so the dynamic tail starts right after it
    data.extend_from_slice(&usize_word(3 * WORD));
    data.extend_from_slice(&usize_word(signature.len()));
    data.extend_from_slice(signature);
    data.resize(4 + 4 * WORD + padded_len, 0);

    Ok(data.into())
}

/// Reads the `index`-th 32-byte word as an unsigned integer
pub fn decode_uint(data: &[u8], index: usize) -> AppResult<BigUint> {
    let start = index * WORD;
    let word = data.get(start..start + WORD).ok_or_else(|| {
        AppError::AbiDecode(format!(
            "expected uint256 at word {}, got {} bytes",
            index,
            data.len()
        ))
    })?;
    Ok(BigUint::from_bytes_be(word))
}

/// Output of `paidOut(address)`
pub fn decode_paid_out(output: &[u8]) -> AppResult<BigUint> {
    decode_uint(output, 0)
}

/// Indexed address parameter stored in a log topic
pub fn decode_address_topic(topic: &B256) -> Address {
    Address::from_word(*topic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn test_selector_matches_known_erc20_selector() {
        assert_eq!(selector("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn test_encode_paid_out_layout() {
        let beneficiary = address!("1111111111111111111111111111111111111111");
        let data = encode_paid_out(beneficiary);

        assert_eq!(data.len(), 36);
        assert_eq!(&data[..4], &selector(PAID_OUT_SIGNATURE));
        assert_eq!(&data[4..16], &[0u8; 12]);
        assert_eq!(&data[16..], beneficiary.as_slice());
    }

    #[test]
    fn test_encode_cash_cheque_beneficiary_layout() {
        let recipient = address!("2222222222222222222222222222222222222222");
        let signature = vec![7u8; 65];
        let data =
            encode_cash_cheque_beneficiary(recipient, &BigUint::from(500u32), &signature).unwrap();

        // selector + 4 head/length words + 65 bytes padded to 96
        assert_eq!(data.len(), 4 + 128 + 96);
        assert_eq!(decode_uint(&data[4..], 1).unwrap(), BigUint::from(500u32));
        assert_eq!(decode_uint(&data[4..], 2).unwrap(), BigUint::from(96u32));
        assert_eq!(decode_uint(&data[4..], 3).unwrap(), BigUint::from(65u32));
        assert_eq!(&data[132..197], signature.as_slice());
        assert!(data[197..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_rejects_values_wider_than_uint256() {
        let too_big = BigUint::from(1u32) << 256;
        let err = encode_cash_cheque_beneficiary(Address::ZERO, &too_big, &[]).unwrap_err();
        assert!(matches!(err, AppError::AbiDecode(_)));
    }

    #[test]
    fn test_decode_paid_out() {
        let mut output = [0u8; 32];
        output[31] = 0x2a;
        assert_eq!(decode_paid_out(&output).unwrap(), BigUint::from(42u32));
        assert!(decode_paid_out(&output[..31]).is_err());
    }

    #[test]
    fn test_address_topic_round_trip() {
        let addr = address!("3333333333333333333333333333333333333333");
        let topic = B256::from(address_word(addr));
        assert_eq!(decode_address_topic(&topic), addr);
    }
}
