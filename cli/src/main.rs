use anyhow::{anyhow, Context};
use clap::Parser;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use tilecache_schema::{Image, Info, InfoSerializer, MediaType, Metadata};

/// One resolution level, given as `WIDTHxHEIGHT` or `WIDTHxHEIGHT@TILEWxTILEH`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ImageArg(Image);

impl FromStr for ImageArg {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (size, tile) = match s.split_once('@') {
            Some((size, tile)) => (size, Some(tile)),
            None => (s, None),
        };
        let (width, height) = dimensions(size)?;
        let image = match tile {
            Some(tile) => {
                let (tile_width, tile_height) = dimensions(tile)?;
                Image::tiled(width, height, tile_width, tile_height)
            }
            None => Image::untiled(width, height),
        };
        Ok(Self(image))
    }
}

fn dimensions(s: &str) -> Result<(u32, u32), anyhow::Error> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| anyhow!("Expected WIDTHxHEIGHT, got {}", s))?;
    Ok((
        w.parse().with_context(|| format!("Invalid width in {}", s))?,
        h.parse().with_context(|| format!("Invalid height in {}", s))?,
    ))
}

#[derive(Parser, Debug)]
#[clap(version, about)]
struct Args {
    /// Identifier of the source image
    #[clap(long)]
    identifier: Option<String>,

    /// Media type of the source image (e.g. image/tiff)
    #[clap(long)]
    media_type: Option<MediaType>,

    /// Resolution level, largest first; may be repeated
    #[clap(long = "image")]
    images: Vec<ImageArg>,

    /// Record the pyramid depth as unknown
    #[clap(long)]
    unknown_resolutions: bool,

    /// JSON file holding the decoded EXIF directory
    #[clap(long)]
    exif: Option<PathBuf>,

    /// JSON file holding an array of IPTC data sets
    #[clap(long)]
    iptc: Option<PathBuf>,

    /// File holding the XMP packet
    #[clap(long)]
    xmp: Option<PathBuf>,

    /// File holding format-native metadata
    #[clap(long)]
    native: Option<PathBuf>,

    /// Where to write the document, stdout if omitted
    #[clap(long)]
    output: Option<PathBuf>,

    /// Pretty-print the document
    #[clap(long)]
    pretty: bool,
}

fn read_metadata(args: &Args) -> Result<Option<Metadata>, anyhow::Error> {
    let mut metadata = Metadata::default();
    if let Some(path) = &args.exif {
        log::debug!("Reading EXIF from {:?}", path);
        let file = File::open(path).with_context(|| format!("Unable to open {:?}", path))?;
        metadata.exif = Some(serde_json::from_reader(file)?);
    }
    if let Some(path) = &args.iptc {
        log::debug!("Reading IPTC from {:?}", path);
        let file = File::open(path).with_context(|| format!("Unable to open {:?}", path))?;
        metadata.iptc = serde_json::from_reader(file)
            .with_context(|| format!("Expected a JSON array of data sets in {:?}", path))?;
    }
    if let Some(path) = &args.xmp {
        log::debug!("Reading XMP from {:?}", path);
        metadata.xmp =
            Some(fs::read_to_string(path).with_context(|| format!("Unable to read {:?}", path))?);
    }
    if let Some(path) = &args.native {
        metadata.native =
            Some(fs::read_to_string(path).with_context(|| format!("Unable to read {:?}", path))?);
    }
    Ok(if metadata.is_empty() {
        None
    } else {
        Some(metadata)
    })
}

fn build_info(args: &Args) -> Result<Info, anyhow::Error> {
    let mut info = Info::new();
    info.set_identifier(args.identifier.as_deref().map(Into::into));
    info.set_media_type(args.media_type.clone());
    if args.unknown_resolutions {
        info.set_num_resolutions(Info::UNKNOWN_RESOLUTIONS);
    }
    for image in &args.images {
        info.push_image(image.0);
    }
    info.set_metadata(read_metadata(args)?);
    Ok(info)
}

fn run(args: &Args) -> Result<(), anyhow::Error> {
    let info = build_info(args)?;
    let serializer = InfoSerializer::new(env!("CARGO_PKG_VERSION"));

    // Nothing is written unless the whole document serialized.
    let mut buf = Vec::new();
    if args.pretty {
        serializer.serialize_pretty(&info, &mut buf)?;
    } else {
        serializer.serialize(&info, &mut buf)?;
    }
    log::debug!(
        "Serialized {} bytes for {:?}",
        buf.len(),
        info.identifier().map(|i| i.as_str())
    );

    match &args.output {
        Some(path) => fs::write(path, &buf).with_context(|| format!("Unable to write {:?}", path))?,
        None => {
            let mut out = std::io::stdout().lock();
            out.write_all(&buf)?;
            out.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::init();
    run(&args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn parse_image_args() {
        assert_eq!(
            "800x600".parse::<ImageArg>().unwrap(),
            ImageArg(Image::untiled(800, 600))
        );
        assert_eq!(
            "800x600@256x128".parse::<ImageArg>().unwrap(),
            ImageArg(Image::tiled(800, 600, 256, 128))
        );
        assert!("800".parse::<ImageArg>().is_err());
        assert!("800xabc".parse::<ImageArg>().is_err());
    }

    #[test]
    fn parse_args() {
        let args = Args::try_parse_from([
            "tilecache",
            "--identifier",
            "img-1",
            "--media-type",
            "image/tiff",
            "--image",
            "1000x800@256x256",
            "--image",
            "500x400@256x256",
            "--pretty",
        ])
        .unwrap();
        assert_eq!(args.identifier.as_deref(), Some("img-1"));
        assert_eq!(args.images.len(), 2);
        assert!(args.pretty);

        let info = build_info(&args).unwrap();
        assert_eq!(info.num_resolutions(), 2);
        assert_eq!(info.media_type().unwrap().as_str(), "image/tiff");
        assert!(info.metadata().is_none());
    }

    #[test]
    fn invalid_media_type_is_rejected() {
        assert!(Args::try_parse_from(["tilecache", "--media-type", "tiff"]).is_err());
    }

    #[test]
    fn iptc_must_be_an_array() {
        let dir = std::env::temp_dir().join(format!("tilecache-cli-iptc-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let iptc = dir.join("iptc.json");
        fs::write(&iptc, r#"{"ObjectName": "sunset"}"#).unwrap();

        let args = Args::try_parse_from(["tilecache", "--iptc", iptc.to_str().unwrap()]).unwrap();
        assert!(build_info(&args).is_err());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn unknown_resolutions() {
        let args =
            Args::try_parse_from(["tilecache", "--unknown-resolutions", "--image", "10x10"])
                .unwrap();
        let info = build_info(&args).unwrap();
        assert_eq!(info.num_resolutions(), Info::UNKNOWN_RESOLUTIONS);
        assert_eq!(info.images().len(), 1);
    }

    #[test]
    fn writes_document_to_output() {
        let dir = std::env::temp_dir().join(format!("tilecache-cli-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let xmp = dir.join("packet.xmp");
        let exif = dir.join("exif.json");
        let iptc = dir.join("iptc.json");
        let output = dir.join("info.json");
        fs::write(&exif, r#"{"Make": "Nikon"}"#).unwrap();
        fs::write(&iptc, r#"[{"ObjectName": "sunset"}]"#).unwrap();
        fs::write(
            &xmp,
            r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"/>"#,
        )
        .unwrap();

        let args = Args::try_parse_from([
            "tilecache",
            "--identifier",
            "img-cli",
            "--image",
            "64x32",
            "--exif",
            exif.to_str().unwrap(),
            "--iptc",
            iptc.to_str().unwrap(),
            "--xmp",
            xmp.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ])
        .unwrap();
        run(&args).unwrap();

        let value: Value = serde_json::from_slice(&fs::read(&output).unwrap()).unwrap();
        assert_eq!(value["applicationVersion"], json!(env!("CARGO_PKG_VERSION")));
        assert_eq!(value["identifier"], json!("img-cli"));
        assert_eq!(value["numResolutions"], json!(1));
        assert_eq!(value["metadata"]["exif"], json!({"Make": "Nikon"}));
        assert_eq!(value["metadata"]["iptc"], json!([{"ObjectName": "sunset"}]));
        assert!(value["metadata"]["xmp"].is_string());

        fs::remove_dir_all(&dir).unwrap();
    }
}
