use rust_decimal::Decimal;

pub fn assert_price(actual: Decimal, expected: Decimal) {
    assert_eq!(
        actual.round_dp(2),
        expected,
        "expected price {expected}, got {actual}"
    );
}

pub fn assert_sorted_desc(values: &[Decimal]) {
    assert!(
        values.windows(2).all(|pair| pair[0] >= pair[1]),
        "expected descending order, got {values:?}"
    );
}
