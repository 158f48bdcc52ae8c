//! SGR parameter tokenization: semicolon separates primary parameters,
//! colon separates sub-parameters within one (`spec.md` §4.1 "Parameter
//! objects").

use smallvec::SmallVec;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub primary: i64,
    pub subparams: SmallVec<[i64; 8]>,
}

impl Param {
    pub fn new(primary: i64) -> Self {
        Self {
            primary,
            subparams: SmallVec::new(),
        }
    }

    /// All values in wire order: the primary value followed by any
    /// sub-parameters.
    pub fn values(&self) -> impl Iterator<Item = i64> + '_ {
        std::iter::once(self.primary).chain(self.subparams.iter().copied())
    }

    pub fn is_colon_separated(&self) -> bool {
        !self.subparams.is_empty()
    }
}

/// Parses a raw CSI parameter string (the bytes between the CSI
/// introducer/prefix and the final byte) into `Param` groups. Empty fields
/// default to `0` per ECMA-48 convention.
pub fn parse_params(raw: &str) -> Vec<Param> {
    raw.split(';')
        .map(|group| {
            let mut parts = group.split(':');
            let primary = parts.next().unwrap_or("").parse::<i64>().unwrap_or(0);
            let subparams = parts
                .map(|p| p.parse::<i64>().unwrap_or(0))
                .collect::<SmallVec<[i64; 8]>>();
            Param { primary, subparams }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semicolon_only_params() {
        let params = parse_params("38;2;255;0;0");
        assert_eq!(params.len(), 5);
        assert_eq!(params[0].primary, 38);
        assert!(!params[0].is_colon_separated());
    }

    #[test]
    fn colon_subparams_grouped() {
        let params = parse_params("38:2::255:0:0");
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].primary, 38);
        assert_eq!(params[0].subparams.as_slice(), &[2, 0, 255, 0, 0]);
    }

    #[test]
    fn empty_field_defaults_to_zero() {
        let params = parse_params(";5");
        assert_eq!(params[0].primary, 0);
        assert_eq!(params[1].primary, 5);
    }
}
