use rand::Rng;

/// 按权重随机选择一项 (累积分布反演)
///
/// - 权重之和 > 0: 取 r ∈ [0, total)，按列表顺序累加，选中第一个累计值 > r 的项；
///   浮点误差导致未命中时回退到第一项
/// - 权重之和为 0: 在所有项中均匀随机选择
/// - 列表为空: 返回 None
///
/// `weight` 返回负数或非有限值时按 0 处理。
pub fn pick_weighted<'a, T, R, F>(items: &'a [T], weight: F, rng: &mut R) -> Option<&'a T>
where
    R: Rng + ?Sized,
    F: Fn(&T) -> f64,
{
    if items.is_empty() {
        return None;
    }

    let sanitize = |w: f64| if w.is_finite() && w > 0.0 { w } else { 0.0 };
    let total: f64 = items.iter().map(|item| sanitize(weight(item))).sum();

    if !(total.is_finite() && total > 0.0) {
        return items.get(rng.gen_range(0..items.len()));
    }

    let pick = rng.gen_range(0.0..total);
    let mut acc = 0.0;
    for item in items {
        let w = sanitize(weight(item));
        if w == 0.0 {
            continue;
        }
        acc += w;
        if pick < acc {
            return Some(item);
        }
    }

    items.first()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_empty_list() {
        let mut rng = StdRng::seed_from_u64(1);
        let items: Vec<f64> = vec![];
        assert!(pick_weighted(&items, |w| *w, &mut rng).is_none());
    }

    #[test]
    fn test_single_item_always_selected() {
        let mut rng = StdRng::seed_from_u64(1);
        let items = vec![("only", 3.5)];
        for _ in 0..100 {
            assert_eq!(pick_weighted(&items, |p| p.1, &mut rng).unwrap().0, "only");
        }
    }

    #[test]
    fn test_zero_weight_item_never_selected_when_others_positive() {
        let mut rng = StdRng::seed_from_u64(2);
        let items = vec![("zero", 0.0), ("neg", -5.0), ("nan", f64::NAN), ("one", 1.0)];
        for _ in 0..1_000 {
            assert_eq!(pick_weighted(&items, |p| p.1, &mut rng).unwrap().0, "one");
        }
    }

    #[test]
    fn test_all_zero_weights_fall_back_to_uniform() {
        let mut rng = StdRng::seed_from_u64(3);
        let items = vec![(1, 0.0), (2, 0.0), (3, 0.0)];
        let mut counts = [0usize; 3];
        for _ in 0..3_000 {
            let picked = pick_weighted(&items, |p| p.1, &mut rng).unwrap();
            counts[picked.0 - 1] += 1;
        }
        for c in counts {
            assert!((800..=1_200).contains(&c), "uneven uniform fallback: {counts:?}");
        }
    }

    #[test]
    fn test_frequencies_converge_to_weight_ratios() {
        let mut rng = StdRng::seed_from_u64(42);
        let items = vec![(0usize, 10.0), (1, 30.0), (2, 60.0)];
        let n = 100_000;
        let mut counts = [0usize; 3];
        for _ in 0..n {
            counts[pick_weighted(&items, |p| p.1, &mut rng).unwrap().0] += 1;
        }
        for (i, expected) in [0.1, 0.3, 0.6].into_iter().enumerate() {
            let freq = counts[i] as f64 / n as f64;
            assert!(
                (freq - expected).abs() < 0.01,
                "item {i}: frequency {freq} vs expected {expected}"
            );
        }
    }

    #[test]
    fn test_weights_need_not_sum_to_100() {
        let mut rng = StdRng::seed_from_u64(9);
        let items = vec![("a", 1.0), ("b", 1.0)];
        let n = 20_000;
        let a = (0..n)
            .filter(|_| pick_weighted(&items, |p| p.1, &mut rng).unwrap().0 == "a")
            .count();
        let freq = a as f64 / n as f64;
        assert!((freq - 0.5).abs() < 0.02, "frequency {freq}");
    }
}
