use std::io::Read;

use super::raw::{parse_number_input, RawInputs};

/// Reads one set of raw inputs per CSV row. The header row names field ids; blank cells are
/// absent fields.
pub fn read_batch_csv<R: Read>(reader: R) -> Result<Vec<RawInputs>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut rows = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let row: RawInputs = headers
            .iter()
            .zip(record.iter())
            .filter(|(field, _)| !field.is_empty())
            .map(|(field, cell)| (field.to_string(), parse_number_input(cell)))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_row_becomes_raw_inputs() {
        let data = "\
arpu,variable_cost,cac,avg_lifetime_months,churn_rate
5000,1500,3000,12,
1000, 900 ,5000,,8
";
        let rows = read_batch_csv(data.as_bytes()).expect("parses");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("avg_lifetime_months"), Some(12.0));
        assert_eq!(rows[0].get("churn_rate"), None);
        assert_eq!(rows[1].get("variable_cost"), Some(900.0));
        assert_eq!(rows[1].get("avg_lifetime_months"), None);
        assert_eq!(rows[1].get("churn_rate"), Some(8.0));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let data = "arpu,cac\n5000,3000,1\n";
        assert!(read_batch_csv(data.as_bytes()).is_err());
    }
}
