//! Daily share of search.
//!
//! For every date in the universe and every brand:
//! `rsv(brand, date) / Σ_brands rsv(·, date) × 100`, zero-filled when the brand
//! has no record that day and zero for every brand when the day total is 0.

use std::collections::HashMap;

use serde::Serialize;

use crate::derive::Universe;
use crate::domain::ObservationRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandShare {
    pub brand: String,
    /// One entry per date in `ShareSeries::dates`, in percent.
    pub shares: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShareSeries {
    pub dates: Vec<String>,
    pub brands: Vec<BrandShare>,
}

impl ShareSeries {
    /// Sum of all brands' shares on the `i`-th date.
    pub fn day_sum(&self, i: usize) -> f64 {
        self.brands.iter().filter_map(|b| b.shares.get(i)).sum()
    }
}

pub fn share_series(records: &[ObservationRecord], universe: &Universe) -> ShareSeries {
    let n_dates = universe.dates.len();
    let n_brands = universe.brands.len();

    let date_slot: HashMap<&str, usize> = universe
        .dates
        .iter()
        .enumerate()
        .map(|(i, d)| (d.as_str(), i))
        .collect();
    let brand_slot: HashMap<&str, usize> = universe
        .brands
        .iter()
        .enumerate()
        .map(|(i, b)| (b.as_str(), i))
        .collect();

    // Repeated (brand, date) rows are summed.
    let mut volume = vec![vec![0.0_f64; n_brands]; n_dates];
    let mut totals = vec![0.0_f64; n_dates];
    for r in records {
        let (Some(&d), Some(&b)) = (date_slot.get(r.date.raw.as_str()), brand_slot.get(r.brand.as_str())) else {
            continue;
        };
        volume[d][b] += r.relative_search_volume;
        totals[d] += r.relative_search_volume;
    }

    let brands = universe
        .brands
        .iter()
        .enumerate()
        .map(|(b, brand)| BrandShare {
            brand: brand.clone(),
            shares: (0..n_dates)
                .map(|d| {
                    if totals[d] == 0.0 {
                        0.0
                    } else {
                        volume[d][b] / totals[d] * 100.0
                    }
                })
                .collect(),
        })
        .collect();

    ShareSeries {
        dates: universe.dates.clone(),
        brands,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::fixtures::rec;

    fn shares(records: &[ObservationRecord]) -> ShareSeries {
        share_series(records, &Universe::from_records(records))
    }

    #[test]
    fn two_brands_split_the_day() {
        let s = shares(&[rec("A", "2023-01", 2.0), rec("B", "2023-01", 6.0)]);
        assert_eq!(s.dates, vec!["2023-01"]);
        assert!((s.brands[0].shares[0] - 25.0).abs() < 1e-12);
        assert!((s.brands[1].shares[0] - 75.0).abs() < 1e-12);
    }

    #[test]
    fn missing_brand_on_a_date_is_zero_filled() {
        let s = shares(&[
            rec("A", "2023-01", 1.0),
            rec("B", "2023-01", 1.0),
            rec("A", "2023-02", 5.0),
        ]);
        assert_eq!(s.brands[1].brand, "B");
        assert_eq!(s.brands[1].shares, vec![50.0, 0.0]);
        assert_eq!(s.brands[0].shares[1], 100.0);
    }

    #[test]
    fn zero_total_day_is_all_zero() {
        let s = shares(&[rec("A", "2023-01", 0.0), rec("B", "2023-01", 0.0), rec("A", "2023-02", 3.0)]);
        assert_eq!(s.brands[0].shares[0], 0.0);
        assert_eq!(s.brands[1].shares[0], 0.0);
        assert_eq!(s.day_sum(0), 0.0);
        assert!(s.brands.iter().all(|b| b.shares.iter().all(|v| v.is_finite())));
    }

    #[test]
    fn every_nonzero_day_sums_to_one_hundred() {
        let s = shares(&[
            rec("A", "d1", 3.0),
            rec("B", "d1", 7.0),
            rec("C", "d1", 11.0),
            rec("A", "d2", 0.5),
            rec("C", "d3", 9.0),
            rec("B", "d3", 1.0),
            rec("B", "d3", 2.0),
        ]);
        for i in 0..s.dates.len() {
            assert!((s.day_sum(i) - 100.0).abs() < 1e-9, "day {i} sums to {}", s.day_sum(i));
        }
    }

    #[test]
    fn duplicate_rows_for_a_brand_are_summed() {
        let s = shares(&[rec("A", "d1", 1.0), rec("A", "d1", 1.0), rec("B", "d1", 2.0)]);
        assert_eq!(s.brands[0].shares, vec![50.0]);
        assert_eq!(s.brands[1].shares, vec![50.0]);
    }
}
