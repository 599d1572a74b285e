//! `waypoint player encode` and `waypoint player decode <json>`

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use serde_json::Value;

use waypoint_core::{NameRule, PlayerId, PlayerReference};

/// Encode and decode player reference records.
#[derive(Subcommand, Debug)]
pub enum PlayerCommand {
    /// Print the record form of a reference.
    Encode(EncodeArgs),

    /// Parse a record and print its fields.
    Decode(DecodeArgs),
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Player uuid.
    #[arg(long)]
    pub uuid: Option<String>,

    /// Player display name.
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Record JSON, e.g. '{"uuid":"…","username":"Alice"}'.
    pub json: String,
}

pub fn run(cmd: PlayerCommand) -> Result<()> {
    match cmd {
        PlayerCommand::Encode(args) => encode(args),
        PlayerCommand::Decode(args) => decode(args),
    }
}

fn encode(args: EncodeArgs) -> Result<()> {
    let id = args
        .uuid
        .as_deref()
        .map(PlayerId::parse)
        .transpose()
        .context("--uuid is not a valid uuid")?;

    let reference = match (id, args.name) {
        (Some(id), Some(name)) => PlayerReference::with_name(id, name),
        (Some(id), None) => PlayerReference::from_id(id),
        (None, Some(name)) => PlayerReference::name_only(name),
        (None, None) => bail!("provide --uuid, --name, or both"),
    };
    println!("{}", Value::Object(reference.to_json()));
    Ok(())
}

fn decode(args: DecodeArgs) -> Result<()> {
    let value: Value = serde_json::from_str(&args.json).context("record is not valid JSON")?;
    let reference = PlayerReference::from_json(&value).context("not a player reference record")?;

    match reference.id {
        Some(id) => println!("uuid: {id}"),
        None => println!("uuid: (none)"),
    }
    match &reference.name {
        NameRule::Fixed(name) => println!("name: {name}"),
        NameRule::ResolveFromId => println!("name: (resolved from uuid)"),
    }
    Ok(())
}
