use std::io::Cursor;

use proptest::prelude::*;
use unifi_dump::{LineScanner, ScanLimits};
use unifi_restore::config::FailurePolicy;
use unifi_restore::format::ImportReport;
use unifi_restore::import::{Importer, InvocationOutcome, RecordSink};

#[derive(Default)]
struct Recorder {
    calls: Vec<(String, String)>,
}

impl RecordSink for Recorder {
    fn import(
        &mut self,
        collection: &str,
        payload: &[u8],
    ) -> unifi_restore::Result<InvocationOutcome> {
        self.calls.push((
            collection.to_string(),
            String::from_utf8(payload.to_vec()).expect("utf8 payload"),
        ));
        Ok(InvocationOutcome::skipped())
    }

    fn describe(&self, collection: &str, _payload: &[u8]) -> String {
        collection.to_string()
    }
}

#[derive(Debug, Clone)]
enum Entry {
    Select(String),
    Record(u32),
}

fn entry() -> impl Strategy<Value = Entry> {
    prop_oneof![
        "[a-z_]{0,8}".prop_map(Entry::Select),
        any::<u32>().prop_map(Entry::Record),
    ]
}

fn render(entry: &Entry) -> String {
    match entry {
        Entry::Select(name) => format!(r#"{{"__cmd":"select","collection":"{name}"}}"#),
        Entry::Record(id) => format!(r#"{{"_id":{id},"collection":"decoy"}}"#),
    }
}

proptest! {
    #[test]
    fn records_follow_nearest_selector(entries in prop::collection::vec(entry(), 0..40)) {
        let dump: String = entries.iter().map(|e| render(e) + "\n").collect();
        let limits = ScanLimits { buffer_capacity: 4096, max_line: 4096 };
        let mut scanner = LineScanner::new(Cursor::new(dump.into_bytes()), limits).unwrap();
        let mut importer = Importer::new(Recorder::default(), FailurePolicy::BestEffort);
        let mut report = ImportReport::new("prop", FailurePolicy::BestEffort, limits);
        let mut out = Vec::new();
        importer.run(&mut scanner, &mut out, &mut report).unwrap();

        let mut expected = Vec::new();
        let mut current = String::new();
        for entry in &entries {
            match entry {
                Entry::Select(name) => current.clone_from(name),
                Entry::Record(_) => expected.push((current.clone(), render(entry))),
            }
        }

        let selectors = entries.iter().filter(|e| matches!(e, Entry::Select(_))).count();
        prop_assert_eq!(report.selectors, selectors);
        prop_assert_eq!(report.records, expected.len());
        prop_assert_eq!(importer.into_sink().calls, expected);
    }
}
