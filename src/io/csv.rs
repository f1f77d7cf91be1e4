/*!
# Saving Chains to CSV

Writes the output of [`crate::hmc::sample`] to a CSV file. Enable via the `csv` feature.
*/

use csv::Writer;
use ndarray::{Array2, Axis};
use std::error::Error;
use std::fs::File;

/**
Saves a `[n_samples, D]` chain as a CSV file.

The file has a header row `sample,dim_0,dim_1,...` followed by one row per sample, in
chain order.

# Arguments

* `samples` - The chain, one row per sample.
* `filename` - The file path where the CSV data will be written.

# Returns

Returns `Ok(())` if successful, or an error if any I/O or CSV formatting issue occurs.

# Examples

```rust
use mini_hmc::io::csv::save_csv;
use ndarray::arr2;

let samples = arr2(&[[0.5, 1.0], [0.25, -1.0]]);
save_csv(&samples, "/tmp/chain.csv").expect("Expecting saving data to succeed");
```
*/
pub fn save_csv<T: std::fmt::Display>(
    samples: &Array2<T>,
    filename: &str,
) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_writer(File::create(filename)?);
    let n_dims = samples.ncols();

    let mut header: Vec<String> = vec!["sample".to_string()];
    header.extend((0..n_dims).map(|i| format!("dim_{}", i)));
    wtr.write_record(&header)?;

    for (sample_idx, sample) in samples.axis_iter(Axis(0)).enumerate() {
        let mut row = vec![sample_idx.to_string()];
        row.extend(sample.iter().map(|v| v.to_string()));
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
