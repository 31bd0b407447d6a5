//! Plain CSV rendering for flat record types.
//!
//! Values are joined with commas as-is. Nothing is quoted or escaped, so a
//! value containing a comma or newline will shift or split its row.

use crate::models::price::PriceRecord;

/// A record with a fixed, declared column order.
pub trait CsvRecord {
    /// Column names, in output order.
    const HEADERS: &'static [&'static str];

    /// Cell values, in the same order as `HEADERS`.
    fn cells(&self) -> Vec<String>;
}

impl CsvRecord for PriceRecord {
    const HEADERS: &'static [&'static str] = &["Postcode", "Address", "Date", "Price", "Locality"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.postcode.clone(),
            self.address.clone(),
            self.date.clone(),
            self.price.to_string(),
            self.locality.clone(),
        ]
    }
}

/// Header line followed by one line per record, each ending in `\n`.
pub fn to_csv<T: CsvRecord>(records: &[T]) -> String {
    let mut csv = String::new();

    csv.push_str(&T::HEADERS.join(","));
    csv.push('\n');

    for record in records {
        let cells = record.cells();
        debug_assert_eq!(cells.len(), T::HEADERS.len());
        csv.push_str(&cells.join(","));
        csv.push('\n');
    }

    csv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(address: &str, date: &str, price: i64) -> PriceRecord {
        PriceRecord {
            postcode: "B1 1AA".to_string(),
            address: address.to_string(),
            date: date.to_string(),
            price,
            locality: "Birmingham".to_string(),
        }
    }

    #[test]
    fn test_to_csv_two_records() {
        let csv = to_csv(&[
            record("4 Broad St", "2020-02-14", 120000),
            record("6 Broad St", "2021-09-01", 135250),
        ]);

        assert_eq!(
            csv,
            "Postcode,Address,Date,Price,Locality\n\
             B1 1AA,4 Broad St,2020-02-14,120000,Birmingham\n\
             B1 1AA,6 Broad St,2021-09-01,135250,Birmingham\n"
        );
    }

    #[test]
    fn test_to_csv_header_only() {
        let csv = to_csv::<PriceRecord>(&[]);
        assert_eq!(csv, "Postcode,Address,Date,Price,Locality\n");
    }

    #[test]
    fn test_to_csv_does_not_escape() {
        let csv = to_csv(&[record("Flat 2, 4 Broad St", "2020-02-14", 1)]);
        let line = csv.lines().nth(1).unwrap();
        assert_eq!(line, "B1 1AA,Flat 2, 4 Broad St,2020-02-14,1,Birmingham");
        assert_eq!(line.split(',').count(), 6);
    }

    struct Pair(&'static str, u8);

    impl CsvRecord for Pair {
        const HEADERS: &'static [&'static str] = &["Name", "Count"];

        fn cells(&self) -> Vec<String> {
            vec![self.0.to_string(), self.1.to_string()]
        }
    }

    #[test]
    fn test_to_csv_any_record_type() {
        assert_eq!(to_csv(&[Pair("a", 1), Pair("b", 2)]), "Name,Count\na,1\nb,2\n");
    }
}
