//! Property-based tests using QuickCheck

use odata_metadata::kind::ResourcePropertyKind;
use quickcheck::QuickCheck;

fn legal_values() -> Vec<u8> {
    vec![
        ResourcePropertyKind::RESOURCE_REFERENCE.bits(),
        ResourcePropertyKind::RESOURCESET_REFERENCE.bits(),
        ResourcePropertyKind::COMPLEX_TYPE.bits(),
        ResourcePropertyKind::COMPLEX_TYPE.with_bag().bits(),
        ResourcePropertyKind::PRIMITIVE.bits(),
        ResourcePropertyKind::PRIMITIVE.with_bag().bits(),
        ResourcePropertyKind::PRIMITIVE.with_key().bits(),
        ResourcePropertyKind::PRIMITIVE.with_etag().bits(),
    ]
}

/// Property: validity agrees with membership in the legality table for
/// every possible bit pattern.
#[test]
fn prop_validity_matches_legality_table() {
    let table = legal_values();
    fn check(bits: u8, table: &[u8]) -> bool {
        ResourcePropertyKind::from_bits(bits).is_some() == table.contains(&bits)
    }
    // u8 is small enough to check exhaustively.
    for bits in 0..=u8::MAX {
        assert!(check(bits, &table), "bit pattern {bits:#010b}");
    }
}

/// Property: `is_kind_of` is reflexive for every legal kind.
#[test]
fn prop_is_kind_of_reflexive() {
    for bits in legal_values() {
        let kind = ResourcePropertyKind::from_bits(bits).unwrap();
        assert!(kind.is_kind_of(kind));
    }
}

/// Property: `is_kind_of` agrees with bitmask containment for arbitrary
/// pairs of legal kinds.
#[test]
fn prop_is_kind_of_matches_containment() {
    fn check(a_index: usize, b_index: usize) -> bool {
        let table = legal_values();
        let a_bits = table[a_index % table.len()];
        let b_bits = table[b_index % table.len()];
        let a = ResourcePropertyKind::from_bits(a_bits).unwrap();
        let b = ResourcePropertyKind::from_bits(b_bits).unwrap();
        a.is_kind_of(b) == ((a_bits & b_bits) == b_bits)
    }
    QuickCheck::new()
        .tests(200)
        .quickcheck(check as fn(usize, usize) -> bool);
}
