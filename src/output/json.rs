use std::io::Write;

use color_eyre::Result;

use crate::dataset::Dataset;

pub fn dump_json<W: Write>(dataset: &Dataset, mut writer: W) -> Result<()> {
    serde_json::to_writer(&mut writer, dataset)?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// The `var allData = ...;` script form that report bundles load.
pub fn data_script(dataset: &Dataset) -> Result<String> {
    let json = serde_json::to_string(dataset)?;
    Ok(format!("var allData = {json};\n"))
}
