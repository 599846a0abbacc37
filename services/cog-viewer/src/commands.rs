//! Line commands for the interactive session.

use cog_common::Colormap;
use viewer::{parse_optional_number, BandType, ViewerCommand};

pub const HELP: &str = "\
Commands:
  open <locator>      set the raster locator (blank clears it)
  colormap <name>     viridis, plasma, inferno, magma, coolwarm, jet
  band <n>            1-based band index
  bandtype <kind>     single or rgb
  min [value]         rescale minimum (blank clears)
  max [value]         rescale maximum (blank clears)
  nodata [value]      nodata value (blank clears)
  show                apply the tile URL and fit the view
  info                print raster info and available controls
  status              print the current tile URL and view
  tiles               list tile URLs covering the view
  help                this text
  quit                leave";

/// One parsed input line.
#[derive(Debug)]
pub enum LineCommand {
    Session(ViewerCommand),
    Info,
    Status,
    Tiles,
    Help,
    Quit,
    Empty,
}

pub fn parse_line(line: &str) -> Result<LineCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "" => LineCommand::Empty,
        "open" | "url" => LineCommand::Session(ViewerCommand::SetLocator(rest.to_string())),
        "colormap" => {
            let colormap: Colormap = rest.parse().map_err(|e| format!("{}", e))?;
            LineCommand::Session(ViewerCommand::SetColormap(colormap))
        }
        "band" => {
            let band = rest
                .parse::<u32>()
                .map_err(|_| format!("band must be a positive integer, got '{}'", rest))?;
            LineCommand::Session(ViewerCommand::SetBand(band))
        }
        "bandtype" => {
            let band_type: BandType = rest.parse().map_err(|e| format!("{}", e))?;
            LineCommand::Session(ViewerCommand::SetBandType(band_type))
        }
        "min" => LineCommand::Session(ViewerCommand::SetMin(number("min", rest)?)),
        "max" => LineCommand::Session(ViewerCommand::SetMax(number("max", rest)?)),
        "nodata" => LineCommand::Session(ViewerCommand::SetNodata(number("nodata", rest)?)),
        "show" => LineCommand::Session(ViewerCommand::Show),
        "info" => LineCommand::Info,
        "status" => LineCommand::Status,
        "tiles" => LineCommand::Tiles,
        "help" | "?" => LineCommand::Help,
        "quit" | "exit" => LineCommand::Quit,
        other => return Err(format!("unknown command '{}'; try 'help'", other)),
    };
    Ok(command)
}

fn number(param: &str, input: &str) -> Result<Option<f64>, String> {
    parse_optional_number(param, input).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_keeps_locator_verbatim() {
        let cmd = parse_line("open  https://x/a b.tif ").unwrap();
        assert!(matches!(
            cmd,
            LineCommand::Session(ViewerCommand::SetLocator(ref l)) if l == "https://x/a b.tif"
        ));
    }

    #[test]
    fn test_open_without_argument_clears() {
        let cmd = parse_line("open").unwrap();
        assert!(matches!(
            cmd,
            LineCommand::Session(ViewerCommand::SetLocator(ref l)) if l.is_empty()
        ));
    }

    #[test]
    fn test_styling_commands() {
        assert!(matches!(
            parse_line("colormap Plasma").unwrap(),
            LineCommand::Session(ViewerCommand::SetColormap(Colormap::Plasma))
        ));
        assert!(matches!(
            parse_line("band 3").unwrap(),
            LineCommand::Session(ViewerCommand::SetBand(3))
        ));
        assert!(matches!(
            parse_line("min -1.5").unwrap(),
            LineCommand::Session(ViewerCommand::SetMin(Some(v))) if v == -1.5
        ));
        assert!(matches!(
            parse_line("nodata").unwrap(),
            LineCommand::Session(ViewerCommand::SetNodata(None))
        ));
        assert!(matches!(
            parse_line("bandtype rgb").unwrap(),
            LineCommand::Session(ViewerCommand::SetBandType(BandType::Rgb))
        ));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(parse_line("colormap rainbow").is_err());
        assert!(parse_line("band two").is_err());
        assert!(parse_line("max lots").is_err());
        assert!(parse_line("zoom 3").is_err());
    }

    #[test]
    fn test_blank_and_meta_commands() {
        assert!(matches!(parse_line("   ").unwrap(), LineCommand::Empty));
        assert!(matches!(parse_line("EXIT").unwrap(), LineCommand::Quit));
        assert!(matches!(parse_line("tiles").unwrap(), LineCommand::Tiles));
    }
}
