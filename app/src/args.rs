use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use lb_convert_services::{
    Config,
    ListenWindow,
    DEFAULT_ARCHIVE,
    DEFAULT_INPUT,
    DEFAULT_LISTENS,
};
use time::{
    format_description::{
        well_known::Rfc3339,
        FormatItem,
    },
    macros::format_description,
    Date,
    OffsetDateTime,
    PrimitiveDateTime,
    UtcOffset,
};

/// Convert a Last.fm scrobble export into a `ListenBrainz` import archive
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub(crate) struct Args {
    /// Last.fm scrobble export to convert
    #[arg(default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Where to write the listens, one JSON object per line
    #[arg(short, long, default_value = DEFAULT_LISTENS)]
    pub output: PathBuf,

    /// Where to write the zip archive to upload
    #[arg(short = 'z', long, default_value = DEFAULT_ARCHIVE)]
    pub archive: PathBuf,

    /// Only include tracks played before this date/time
    #[arg(short, long, value_parser = parse_datetime)]
    pub before: Option<OffsetDateTime>,

    /// Only include tracks played after this date/time
    #[arg(short, long, value_parser = parse_datetime)]
    pub after: Option<OffsetDateTime>,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config {
            input: args.input,
            listens: args.output,
            archive: args.archive,
            window: ListenWindow {
                before: args.before.map(OffsetDateTime::unix_timestamp),
                after: args.after.map(OffsetDateTime::unix_timestamp),
            },
        }
    }
}


fn parse_datetime(dt: &str) -> Result<OffsetDateTime> {
    const FMTS_DT: &[&[FormatItem]] = &[
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]"),
        format_description!("[year]-[month]-[day] [hour]"),
    ];
    const FMTS_DATE: &[&[FormatItem]] = &[format_description!("[year]-[month]-[day]")];

    OffsetDateTime::parse(dt, &Rfc3339).or_else(|e| -> Result<OffsetDateTime> {
        let local_tz = UtcOffset::current_local_offset()?;
        FMTS_DT
            .iter()
            .find_map(|fmt| PrimitiveDateTime::parse(dt, fmt).ok())
            .or_else(|| {
                FMTS_DATE
                    .iter()
                    .find_map(|fmt| Date::parse(dt, fmt).ok())
                    .and_then(|d| d.with_hms(0, 0, 0).ok())
            })
            .map(|pdt| pdt.assume_offset(local_tz))
            .ok_or(e.into())
    })
}
