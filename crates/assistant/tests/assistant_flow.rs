use std::sync::{Arc, Mutex};

use assistant::{
    distribute_clusters, parse_command, project, AssistantError, ColorMatcher, DesignSession,
    DesignStore,
};
use async_trait::async_trait;
use shared::domain::{DesignId, DesignRecord};

#[derive(Default)]
struct MemoryStore {
    records: Mutex<Vec<DesignRecord>>,
}

#[async_trait]
impl DesignStore for MemoryStore {
    async fn save_design(&self, record: &DesignRecord) -> anyhow::Result<()> {
        self.records.lock().expect("lock").push(record.clone());
        Ok(())
    }
}

#[tokio::test]
async fn assistant_flow_from_new_design_to_committed_edits() {
    let colors = ["White", "Wild Berry", "Blood Orange"];
    let store = Arc::new(MemoryStore::default());
    let mut session =
        DesignSession::new(DesignId(1), distribute_clusters(12, &colors), store.clone())
            .with_matcher(ColorMatcher::default());
    assert_eq!(project(12, &colors).sizes[1].quantity, 24);

    for command in [
        "change wildberry clusters to 6",
        "make orange to 2 clusters",
        "add gold with 3 clusters",
        "remove White",
    ] {
        session.propose(command).await.expect("proposed");
        session.confirm().await.expect("confirmed");
    }

    let colors: Vec<_> = session.clusters().iter().map(|c| c.color.as_str()).collect();
    assert_eq!(colors, vec!["Wild Berry", "Blood Orange", "gold"]);
    assert_eq!(session.clusters()[1].total(), 2);

    let records = store.records.lock().expect("lock");
    assert_eq!(records.len(), 4);
    let last = records.last().expect("record");
    assert_eq!(last.snapshot.colors, vec!["Wild Berry", "Blood Orange", "gold"]);
    let expected: u64 = session.clusters().iter().map(|c| c.total()).sum();
    assert_eq!(u64::from(last.snapshot.total_clusters), expected);
}

#[tokio::test]
async fn rejected_commands_leave_design_untouched() {
    let mut session = DesignSession::new(
        DesignId(2),
        distribute_clusters(4, &["Pink"]),
        Arc::new(MemoryStore::default()),
    );
    assert!(parse_command("change pink 11\" balloons to 20").is_some());

    session
        .propose("change pink 11\" balloons to 20")
        .await
        .expect("parsed");
    let err = session.confirm().await.expect_err("unsupported");
    assert!(matches!(err, AssistantError::UnsupportedCorrection { .. }));
    assert_eq!(session.clusters()[0].total(), 4);
}
