//! Integration tests cross-checking selections against exhaustive search

use testresult::TestResult;

use redeem::selection::{CardSelector, Strategy, observer::NoopObserver};

/// Deterministic linear congruential generator for reproducible inputs.
struct Lcg(u64);

impl Lcg {
    fn next_below(&mut self, bound: u64) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        (self.0 >> 33) % bound
    }

    fn amount(&mut self, bound: u64) -> i64 {
        i64::try_from(self.next_below(bound)).unwrap_or_default()
    }
}

fn select(price: i64, denominations: &[i64]) -> TestResult<(Strategy, Vec<usize>)> {
    let (strategy, indices) =
        CardSelector::new().select_indices(price, denominations, &mut NoopObserver)?;

    Ok((strategy, indices.to_vec()))
}

fn sum_of(indices: &[usize], denominations: &[i64]) -> i64 {
    indices.iter().filter_map(|&i| denominations.get(i)).sum()
}

/// Smallest loss over every subset, and whether some subset burns by exactly that much.
fn brute_force(price: i64, denominations: &[i64]) -> (i64, bool) {
    let mut best = i64::MAX;
    let mut burn_ties = false;

    for mask in 0_u32..(1 << denominations.len()) {
        let sum: i64 = denominations
            .iter()
            .enumerate()
            .filter(|&(i, _)| mask & (1 << i) != 0)
            .map(|(_, &d)| d)
            .sum();

        let loss = (sum - price).abs();

        if loss < best {
            best = loss;
            burn_ties = sum > price;
        } else if loss == best && sum > price {
            burn_ties = true;
        }
    }

    (best, burn_ties)
}

fn random_case(rng: &mut Lcg) -> (i64, Vec<i64>) {
    let len = usize::try_from(rng.next_below(7)).unwrap_or_default();
    let step = rng.amount(4) + 1;
    let denominations = (0..len).map(|_| rng.amount(12) * step).collect();
    let price = rng.amount(80);

    (price, denominations)
}

#[test]
fn selections_have_minimal_loss() -> TestResult {
    let mut rng = Lcg(0x5eed);

    for _ in 0..2000 {
        let (price, denominations) = random_case(&mut rng);
        let (_, indices) = select(price, &denominations)?;

        let sum = sum_of(&indices, &denominations);
        let (best, burn_ties) = brute_force(price, &denominations);

        assert_eq!(
            (sum - price).abs(),
            best,
            "price {price}, cards {denominations:?}, selected {indices:?}"
        );

        if burn_ties && best > 0 {
            assert!(
                sum > price,
                "tie should burn: price {price}, cards {denominations:?}, selected {indices:?}"
            );
        }
    }

    Ok(())
}

#[test]
fn selections_are_ordered_distinct_input_indices() -> TestResult {
    let mut rng = Lcg(42);

    for _ in 0..500 {
        let (price, denominations) = random_case(&mut rng);
        let (_, indices) = select(price, &denominations)?;

        assert!(
            indices.windows(2).all(|pair| pair.first() < pair.last()),
            "indices out of order: {indices:?}"
        );
        assert!(
            indices.iter().all(|&i| i < denominations.len()),
            "index out of range: {indices:?}"
        );
    }

    Ok(())
}

#[test]
fn zero_sum_inputs_select_nothing() -> TestResult {
    for len in 0..5 {
        let (strategy, indices) = select(100, &vec![0; len])?;

        assert_eq!(strategy, Strategy::ZeroSum);
        assert!(indices.is_empty(), "expected nothing for {len} empty cards");
    }

    Ok(())
}

#[test]
fn insufficient_inputs_select_everything() -> TestResult {
    let mut rng = Lcg(7);

    for _ in 0..200 {
        let (_, denominations) = random_case(&mut rng);
        let total: i64 = denominations.iter().sum();

        if total == 0 {
            continue;
        }

        let (strategy, indices) = select(total + rng.amount(10), &denominations)?;

        assert_eq!(strategy, Strategy::SumInsufficient);
        assert_eq!(indices, (0..denominations.len()).collect::<Vec<_>>());
    }

    Ok(())
}

#[test]
fn exact_subsets_are_found() -> TestResult {
    let mut rng = Lcg(99);

    for _ in 0..500 {
        let (_, denominations) = random_case(&mut rng);

        // Price every other card, which is always reachable exactly
        let price: i64 = denominations.iter().step_by(2).sum();
        let (_, indices) = select(price, &denominations)?;

        assert_eq!(
            sum_of(&indices, &denominations),
            price,
            "cards {denominations:?}, selected {indices:?}"
        );
    }

    Ok(())
}

#[test]
fn selection_is_idempotent() -> TestResult {
    let mut rng = Lcg(1234);

    for _ in 0..200 {
        let (price, denominations) = random_case(&mut rng);

        assert_eq!(select(price, &denominations)?, select(price, &denominations)?);
    }

    Ok(())
}

#[test]
fn later_cards_win_equal_sum_ties() -> TestResult {
    // {0, 1} and {2} both reach 6 exactly
    let (_, indices) = select(6, &[2, 4, 6])?;

    assert_eq!(indices, vec![2]);

    Ok(())
}
