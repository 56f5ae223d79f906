use anyhow::Result;
use std::path::Path;

use bibeasy_convert::ccv::read_ccv_file;
use bibeasy_convert::{ccv_id_map, rewrite_text};

pub fn run_rewrite(xml_src: &Path, xml_dest: &Path, input: &str, sort: bool) -> Result<()> {
    let src = read_ccv_file(xml_src)?;
    let dest = read_ccv_file(xml_dest)?;
    let map = ccv_id_map(&src, &dest);
    log::info!(
        "Matched {} of {} source publications",
        map.len(),
        src.len()
    );

    let text = super::file_or_inline(input)?;
    println!("{}", rewrite_text(&text, &map, sort));
    Ok(())
}
