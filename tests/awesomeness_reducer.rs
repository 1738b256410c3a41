use bytes::Bytes;
use mrunit::codec::{encode_key, encode_record};
use mrunit::config::Configuration;
use mrunit::driver::{MapDriver, MapReduceDriver, ReduceDriver};
use mrunit::rating::{RatingRecord, UserInfo};
use mrunit::workload::{self, awesomeness};
use std::io::Write;

fn jane() -> RatingRecord {
    RatingRecord::UserInfo(UserInfo::new("Jane", "Doe", "US", "NYC", "Eng", "CS"))
}

fn values(records: &[RatingRecord]) -> Vec<Bytes> {
    records.iter().map(|r| encode_record(r).unwrap()).collect()
}

fn reducer() -> ReduceDriver {
    ReduceDriver::new(awesomeness::reduce)
}

#[test]
fn user_with_high_rating_is_emitted() {
    reducer()
        .with_input(encode_key(42), values(&[jane(), RatingRecord::Rating(8.2)]))
        .with_output("42", "Jane\tDoe\tUS\tNYC\tEng\tCS\t8.2")
        .run_test()
        .unwrap();
}

#[test]
fn low_rating_is_filtered() {
    let out = reducer()
        .with_input(encode_key(7), values(&[RatingRecord::Rating(5.0)]))
        .run()
        .unwrap();
    assert!(out.is_empty());
}

#[test]
fn last_rating_wins() {
    let out = reducer()
        .with_input(
            encode_key(3),
            values(&[jane(), RatingRecord::Rating(9.0), RatingRecord::Rating(4.0)]),
        )
        .run()
        .unwrap();
    assert!(out.is_empty());
}

#[test]
fn empty_group_emits_nothing() {
    let out = reducer()
        .with_input(encode_key(99), Vec::<Bytes>::new())
        .run()
        .unwrap();
    assert!(out.is_empty());
}

#[test]
fn threshold_boundary() {
    reducer()
        .with_input(encode_key(1), values(&[jane(), RatingRecord::Rating(6.5)]))
        .with_input(encode_key(2), values(&[jane(), RatingRecord::Rating(6.50001)]))
        .with_input(encode_key(3), values(&[jane()]))
        .with_input(encode_key(4), values(&[RatingRecord::Rating(10.0)]))
        .with_output("2", "Jane\tDoe\tUS\tNYC\tEng\tCS\t6.50001")
        .with_output("4", "\t\t\t\t\t\t10.0")
        .run_test()
        .unwrap();
}

#[test]
fn rerunning_gives_the_same_output() {
    let driver = reducer().with_input(encode_key(5), values(&[RatingRecord::Rating(7.5), jane()]));
    assert_eq!(driver.run().unwrap(), driver.run().unwrap());
}

#[test]
fn mapper_emits_tagged_records() {
    MapDriver::new(awesomeness::map)
        .with_input("users.tsv", "42\tJane\tDoe\tUS\tNYC\tEng\tCS\n")
        .with_input("ratings.tsv", "42\t8.2\n")
        .with_output(encode_key(42), encode_record(&jane()).unwrap())
        .with_output(encode_key(42), encode_record(&RatingRecord::Rating(8.2)).unwrap())
        .run_test()
        .unwrap();
}

#[test]
fn full_job_joins_and_filters() {
    let users = "42\tJane\tDoe\tUS\tNYC\tEng\tCS\n\
                 7\tJohn\tRoe\tDE\tBerlin\tSci\tMath\n\
                 3\tAnna\tLee\tFR\tParis\tArt\tDesign\n";
    let ratings = "42\t8.2\n7\t5.0\n3\t9.0\n3\t4.0\n11\t7.0\n";
    MapReduceDriver::new(workload::named("awesomeness").unwrap())
        .with_input("users.tsv", users)
        .with_input("ratings.tsv", ratings)
        .with_output("11", "\t\t\t\t\t\t7.0")
        .with_output("42", "Jane\tDoe\tUS\tNYC\tEng\tCS\t8.2")
        .run_test()
        .unwrap();
}

#[test]
fn map_side_join_reads_users_file() {
    let mut users = tempfile::NamedTempFile::new().unwrap();
    writeln!(users, "42\tJane\tDoe\tUS\tNYC\tEng\tCS").unwrap();
    let mut conf = Configuration::new();
    conf.set(
        awesomeness::USERS_FILE_PATH_KEY,
        format!("file://{}", users.path().display()),
    );

    MapReduceDriver::new(workload::named("awesomeness").unwrap())
        .with_configuration(conf)
        .with_input("ratings.tsv", "42\t8.2\n")
        .with_output("42", "Jane\tDoe\tUS\tNYC\tEng\tCS\t8.2")
        .run_test()
        .unwrap();
}

#[test]
fn malformed_value_fails_the_reduce() {
    let err = reducer()
        .with_input(encode_key(1), [Bytes::from_static(br#"{"type":"Comment"}"#)])
        .run()
        .unwrap_err();
    assert!(err.to_string().contains("Malformed rating record"));
}
