//! A MapReduce-compatible join of user information and awesomeness ratings.
//!
//! Input lines are tab separated. A line with 7 fields describes a user:
//!
//! ```text
//! id  first_name  last_name  country  city  faculty  department
//! ```
//!
//! A line with 2 fields is a rating: `id  rating`. The reducer emits one
//! line per user whose rating is above [`RATING_THRESHOLD`].
//!
//! [`RATING_THRESHOLD`]: crate::rating::RATING_THRESHOLD

use crate::codec;
use crate::config::Configuration;
use crate::rating::{aggregate, RatingRecord, UserInfo};
use crate::utils::{data_lines, read_file, string_from_bytes};
use crate::*;
use anyhow::{bail, Context, Result};
use bytes::Bytes;
use log::{debug, trace};
use std::collections::HashMap;
use std::path::Path;

/// Path of a users table to join against ratings on the map side.
pub const USERS_FILE_PATH_KEY: &str = "awesomeness.users.file.path";

#[derive(Debug, PartialEq)]
enum Line {
    User(i64, UserInfo),
    Rating(i64, f32),
}

fn parse_id(field: &str) -> Result<i64> {
    field
        .trim()
        .parse()
        .with_context(|| format!("Invalid user id `{}`", field))
}

fn parse_line(line: &str) -> Result<Line> {
    let fields = line.split('\t').collect::<Vec<_>>();
    match fields.as_slice() {
        [id, first_name, last_name, country, city, faculty, department] => Ok(Line::User(
            parse_id(id)?,
            UserInfo::new(first_name, last_name, country, city, faculty, department),
        )),
        [id, rating] => {
            let rating = rating
                .trim()
                .parse::<f32>()
                .with_context(|| format!("Invalid rating `{}`", rating))?;
            Ok(Line::Rating(parse_id(id)?, rating))
        }
        _ => bail!("Expected 2 or 7 tab separated fields, got {}", fields.len()),
    }
}

fn load_users(path: &Path) -> Result<HashMap<i64, UserInfo>> {
    let contents = string_from_bytes(read_file(path)?)?;
    let mut users = HashMap::new();
    for (line_no, line) in data_lines(&contents) {
        match parse_line(line).with_context(|| format!("{}:{}", path.display(), line_no))? {
            Line::User(id, user) => {
                users.insert(id, user);
            }
            Line::Rating(..) => bail!("{}:{}: expected a user line", path.display(), line_no),
        }
    }
    debug!("Loaded {} users from {}", users.len(), path.display());
    Ok(users)
}

fn emit(id: i64, record: RatingRecord) -> Result<KeyValue> {
    Ok(KeyValue {
        key: codec::encode_key(id),
        value: codec::encode_record(&record)?,
    })
}

pub fn map(kv: KeyValue, aux: Bytes) -> MapOutput {
    let conf = Configuration::from_aux(&aux)?;
    let users = match conf.get_path(USERS_FILE_PATH_KEY) {
        Some(path) => Some(load_users(&path)?),
        None => None,
    };

    let source = String::from_utf8_lossy(&kv.key).to_string();
    let contents = string_from_bytes(kv.value)?;
    let mut map_output = Vec::new();

    for (line_no, line) in data_lines(&contents) {
        let parsed = parse_line(line).with_context(|| format!("{}:{}", source, line_no));
        match parsed {
            Ok(Line::User(id, user)) => map_output.push(emit(id, RatingRecord::UserInfo(user))),
            Ok(Line::Rating(id, rating)) => {
                if let Some(user) = users.as_ref().and_then(|users| users.get(&id)) {
                    map_output.push(emit(id, RatingRecord::UserInfo(user.clone())));
                }
                map_output.push(emit(id, RatingRecord::Rating(rating)));
            }
            Err(e) => map_output.push(Err(e)),
        }
    }
    trace!("{} emitted {} records", source, map_output.len());

    Ok(Box::new(map_output.into_iter()))
}

pub fn reduce(
    key: Bytes,
    values: Box<dyn Iterator<Item = Bytes> + '_>,
    _aux: Bytes,
) -> ReduceOutput {
    let id = codec::decode_key(key)?;
    let records = values
        .map(|value| codec::decode_record(&value))
        .collect::<Result<Vec<_>>>()?;

    Ok(aggregate(id, records)
        .map(|(id, record)| KeyValue::new(id.to_string(), record.to_string())))
}
