/// True iff `s` is `0x` followed by exactly 40 hex characters.
/// Pure and synchronous; the submit path never reaches the network with an
/// address that fails this check.
pub fn is_valid_evm_address(s: &str) -> bool {
    let rest = match s.strip_prefix("0x") {
        Some(rest) => rest,
        None => return false,
    };
    rest.len() == 40 && rest.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_addresses() {
        assert!(is_valid_evm_address(
            "0x1111111111111111111111111111111111111111"
        ));
        assert!(is_valid_evm_address(
            "0xaAbBcCdDeEfF00112233445566778899aabbccdd"
        ));
    }

    #[test]
    fn rejects_everything_else() {
        assert!(!is_valid_evm_address(""));
        assert!(!is_valid_evm_address("not-an-address"));
        // missing prefix
        assert!(!is_valid_evm_address(
            "1111111111111111111111111111111111111111"
        ));
        // too short / too long
        assert!(!is_valid_evm_address("0x111111111111111111111111111111111111111"));
        assert!(!is_valid_evm_address(
            "0x11111111111111111111111111111111111111111"
        ));
        // non-hex character
        assert!(!is_valid_evm_address(
            "0x111111111111111111111111111111111111111g"
        ));
        // uppercase prefix is not the 0x form
        assert!(!is_valid_evm_address(
            "0X1111111111111111111111111111111111111111"
        ));
    }
}
