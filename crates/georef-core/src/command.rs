//! Conversion command text.
//!
//! Two templates are produced: a direct `gdal_translate` call that attaches
//! the spatial reference to the plan, and a three-step pipeline that turns
//! the plan into a 1-bit GeoTIFF. Nothing here runs a process.

use serde::{Deserialize, Serialize};

use crate::error::GeorefResult;
use crate::projection::ProjectionDefinition;
use crate::worldfile::{image_base_name, world_file_extension};

/// GeoTIFF compression for the standard command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Compression {
    #[default]
    Lzw,
    Deflate,
    Jpeg,
    None,
}

impl Compression {
    /// GDAL creation option value, `None` when no option is emitted.
    pub fn gdal_name(self) -> Option<&'static str> {
        match self {
            Compression::Lzw => Some("LZW"),
            Compression::Deflate => Some("DEFLATE"),
            Compression::Jpeg => Some("JPEG"),
            Compression::None => None,
        }
    }
}

/// Options for the generated commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandOptions {
    pub compression: Compression,
    /// Emit `-co TILED=YES`
    pub tiled: bool,
    /// Appended to the base name of the standard GeoTIFF
    pub output_suffix: String,
    /// Appended to the base name of the monochrome intermediates
    pub mono_suffix: String,
}

impl Default for CommandOptions {
    fn default() -> Self {
        Self {
            compression: Compression::Lzw,
            tiled: true,
            output_suffix: "_georef".to_string(),
            mono_suffix: "_bw".to_string(),
        }
    }
}

/// Both command variants for one plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedCommands {
    pub standard: String,
    /// Three lines: dither, copy the sidecar, georeference
    pub monochrome: String,
}

/// Double-quote a shell argument.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        if matches!(ch, '"' | '\\' | '$' | '`') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

fn tiling_option(options: &CommandOptions) -> &'static str {
    if options.tiled {
        " -co TILED=YES"
    } else {
        ""
    }
}

/// `gdal_translate` call assigning the spatial reference.
pub fn standard_command(
    image_name: &str,
    projection: &ProjectionDefinition,
    options: &CommandOptions,
) -> String {
    let base = image_base_name(image_name);
    let compression = options
        .compression
        .gdal_name()
        .map(|name| format!(" -co COMPRESS={name}"))
        .unwrap_or_default();

    format!(
        "gdal_translate -of GTiff -a_srs {srs}{compression}{tiled} {input} {output}",
        srs = quote(projection.srs_text()),
        tiled = tiling_option(options),
        input = quote(image_name),
        output = quote(&format!("{base}{}.tif", options.output_suffix)),
    )
}

/// Grayscale dither, sidecar copy and bi-level georeferencing.
///
/// The copied sidecar keeps the original world file's numbers; only its name
/// changes to follow the PNG intermediate.
///
/// # Errors
///
/// Returns [`crate::GeorefError::UnsupportedFormat`] when the image has no
/// world file convention.
pub fn monochrome_pipeline(
    image_name: &str,
    projection: &ProjectionDefinition,
    options: &CommandOptions,
) -> GeorefResult<String> {
    let base = image_base_name(image_name);
    let extension = image_name.rsplit_once('.').map_or("", |(_, ext)| ext);
    let sidecar = world_file_extension(extension)?;
    let mono = format!("{base}{}", options.mono_suffix);

    let dither = format!(
        "magick {} -colorspace Gray -dither FloydSteinberg -monochrome {}",
        quote(image_name),
        quote(&format!("{mono}.png")),
    );
    let copy = format!(
        "cp {} {}",
        quote(&format!("{base}.{sidecar}")),
        quote(&format!("{mono}.pgw")),
    );
    let translate = format!(
        "gdal_translate -of GTiff -a_srs {} -co COMPRESS=CCITTFAX4 -co NBITS=1{} {} {}",
        quote(projection.srs_text()),
        tiling_option(options),
        quote(&format!("{mono}.png")),
        quote(&format!("{mono}{}.tif", options.output_suffix)),
    );

    Ok(format!("{dither}\n{copy}\n{translate}"))
}

/// Render both variants.
pub fn generate_commands(
    image_name: &str,
    projection: &ProjectionDefinition,
    options: &CommandOptions,
) -> GeorefResult<GeneratedCommands> {
    Ok(GeneratedCommands {
        standard: standard_command(image_name, projection, options),
        monochrome: monochrome_pipeline(image_name, projection, options)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeorefError;

    #[test]
    fn test_standard_default() {
        let cmd = standard_command(
            "000390_T.E-12.jpg",
            &ProjectionDefinition::pl1992(),
            &CommandOptions::default(),
        );
        assert_eq!(
            cmd,
            r#"gdal_translate -of GTiff -a_srs "EPSG:2180" -co COMPRESS=LZW -co TILED=YES "000390_T.E-12.jpg" "000390_T.E-12_georef.tif""#
        );
    }

    #[test]
    fn test_standard_options() {
        let options = CommandOptions {
            compression: Compression::None,
            tiled: false,
            ..CommandOptions::default()
        };
        let cmd = standard_command("plan.png", &ProjectionDefinition::pl1992(), &options);
        assert_eq!(
            cmd,
            r#"gdal_translate -of GTiff -a_srs "EPSG:2180" "plan.png" "plan_georef.tif""#
        );

        let deflate = CommandOptions {
            compression: Compression::Deflate,
            ..CommandOptions::default()
        };
        let cmd = standard_command("plan.png", &ProjectionDefinition::pl1992(), &deflate);
        assert!(cmd.contains("-co COMPRESS=DEFLATE -co TILED=YES"));
    }

    #[test]
    fn test_custom_srs_inserted_verbatim() {
        let projection =
            ProjectionDefinition::custom("+proj=tmerc +lon_0=19 +k=0.9993 +units=m", 19.0);
        let cmd = standard_command("plan.tif", &projection, &CommandOptions::default());
        assert!(cmd.contains(r#"-a_srs "+proj=tmerc +lon_0=19 +k=0.9993 +units=m""#));
    }

    #[test]
    fn test_monochrome_pipeline() {
        let text = monochrome_pipeline(
            "plan.jpg",
            &ProjectionDefinition::pl1992(),
            &CommandOptions::default(),
        )
        .unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                r#"magick "plan.jpg" -colorspace Gray -dither FloydSteinberg -monochrome "plan_bw.png""#,
                r#"cp "plan.jgw" "plan_bw.pgw""#,
                r#"gdal_translate -of GTiff -a_srs "EPSG:2180" -co COMPRESS=CCITTFAX4 -co NBITS=1 -co TILED=YES "plan_bw.png" "plan_bw_georef.tif""#,
            ]
        );
    }

    #[test]
    fn test_monochrome_unsupported_format() {
        let err = monochrome_pipeline(
            "plan.webp",
            &ProjectionDefinition::pl1992(),
            &CommandOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, GeorefError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_quotes_escaped() {
        assert_eq!(quote(r#"my "best" plan.jpg"#), r#""my \"best\" plan.jpg""#);
        assert_eq!(quote("$HOME`x`"), r#""\$HOME\`x\`""#);

        let cmd = standard_command(
            r#"a"b.jpg"#,
            &ProjectionDefinition::pl1992(),
            &CommandOptions::default(),
        );
        assert!(cmd.ends_with(r#""a\"b.jpg" "a\"b_georef.tif""#));
    }

    #[test]
    fn test_compression_serde_names() {
        let json = serde_json::to_string(&Compression::Deflate).unwrap();
        assert_eq!(json, "\"DEFLATE\"");
        let parsed: CommandOptions = serde_json::from_str(r#"{"compression":"NONE"}"#).unwrap();
        assert_eq!(parsed.compression, Compression::None);
        assert!(parsed.tiled);
        assert_eq!(parsed.output_suffix, "_georef");
    }
}
