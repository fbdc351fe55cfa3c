//! End-to-end editing flows: build a walkthrough, annotate a screenshot,
//! reorder and save, and confirm the stored document round-trips.

use kurbo::Point;
use sw_annotate::{AnnotationEditor, ImageFrame};
use sw_core::{BlockData, BlockKind, DocumentStatus, Document};
use sw_editor::{
    Autosave, DocMutation, DocumentStore, EditorSession, InMemoryStore,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn session() -> EditorSession {
    EditorSession::with_autosave(Document::new("Reset your router"), Autosave::new(100))
}

#[test]
fn author_builds_and_saves_a_walkthrough() {
    init_logging();
    let mut s = session();
    let mut store = InMemoryStore::new();
    let doc_id = s.document().id;

    let first = s.document().steps[0].id;
    s.apply(
        DocMutation::SetStepTitle {
            step: first,
            title: "Unplug the router".into(),
        },
        0,
    );
    s.apply(
        DocMutation::AddBlock {
            step: first,
            kind: BlockKind::Text,
            after_index: -1,
        },
        10,
    );
    s.apply(DocMutation::AddStep { after: Some(first) }, 20);
    let second = s.document().steps[1].id;
    s.apply(
        DocMutation::AddBlock {
            step: second,
            kind: BlockKind::Callout,
            after_index: -1,
        },
        30,
    );
    s.apply(DocMutation::SetStatus(DocumentStatus::Published), 40);

    s.flush(&mut store).unwrap();
    assert!(!s.is_dirty());

    let loaded = store.load_document(doc_id).unwrap();
    assert_eq!(loaded.status, DocumentStatus::Published);
    assert_eq!(loaded.steps.len(), 2);
    assert_eq!(loaded.steps[0].title, "Unplug the router");
    assert_eq!(loaded.steps[1].blocks[0].kind(), BlockKind::Callout);
    assert!(loaded.steps.iter().all(|st| !st.id.is_temp()));
}

#[test]
fn duplicate_lands_next_to_the_original() {
    init_logging();
    let mut s = session();
    let step = s.document().steps[0].id;

    s.apply(
        DocMutation::AddBlock {
            step,
            kind: BlockKind::Heading,
            after_index: -1,
        },
        0,
    );
    let heading = s.document().steps[0].blocks[0].id;
    s.apply(
        DocMutation::AddBlock {
            step,
            kind: BlockKind::Text,
            after_index: 0,
        },
        10,
    );
    s.apply(DocMutation::DuplicateBlock { step, block: heading }, 20);

    let blocks = &s.document().steps[0].blocks;
    let kinds: Vec<_> = blocks.iter().map(|b| b.kind()).collect();
    assert_eq!(
        kinds,
        vec![BlockKind::Heading, BlockKind::Heading, BlockKind::Text]
    );
    let mut ids: Vec<_> = blocks.iter().map(|b| b.id).collect();
    ids.dedup();
    assert_eq!(ids.len(), 3);
    assert_eq!(blocks[1].data, blocks[0].data);
}

#[test]
fn annotation_gesture_commits_through_the_session() {
    init_logging();
    let mut s = session();
    let step = s.document().steps[0].id;
    s.apply(
        DocMutation::AddBlock {
            step,
            kind: BlockKind::AnnotatedImage,
            after_index: -1,
        },
        0,
    );
    let block = s.document().steps[0].blocks[0].id;

    // Place a marker on a 800x400 rendering, drag it, then commit the
    // result back onto the block.
    let mut editor = AnnotationEditor::new(Vec::new(), ImageFrame::new(800.0, 400.0));
    editor.pointer_down(Point::new(400.0, 200.0));
    editor.pointer_move(Point::new(560.0, 240.0)); // +20%, +10%
    editor.pointer_up();
    assert!(editor.is_idle());

    s.apply(
        DocMutation::SetMarkers {
            step,
            block,
            markers: editor.markers().to_vec(),
        },
        10,
    );

    let BlockData::AnnotatedImage { markers, .. } = &s.document().steps[0].blocks[0].data else {
        panic!("expected annotated image block");
    };
    assert_eq!(markers.len(), 1);
    assert!((markers[0].x - 70.0).abs() < 1e-9);
    assert!((markers[0].y - 60.0).abs() < 1e-9);
}

#[test]
fn reorder_survives_a_save_and_reload() {
    init_logging();
    let mut s = session();
    let mut store = InMemoryStore::new();
    let doc_id = s.document().id;

    let first = s.document().steps[0].id;
    s.apply(
        DocMutation::SetStepTitle {
            step: first,
            title: "A".into(),
        },
        0,
    );
    s.apply(DocMutation::AddStep { after: None }, 10);
    let second = s.document().steps[1].id;
    s.apply(
        DocMutation::SetStepTitle {
            step: second,
            title: "B".into(),
        },
        20,
    );
    s.flush(&mut store).unwrap();

    // Move B before A; ids are now server-assigned.
    let (a, b) = (s.document().steps[0].id, s.document().steps[1].id);
    s.apply(DocMutation::MoveStep { from: b, to: a }, 30);
    s.flush(&mut store).unwrap();

    let loaded = store.load_document(doc_id).unwrap();
    let titles: Vec<_> = loaded.steps.iter().map(|st| st.title.as_str()).collect();
    assert_eq!(titles, vec!["B", "A"]);
    let orders: Vec<_> = loaded.steps.iter().map(|st| st.order).collect();
    assert_eq!(orders, vec![0, 1]);
}

#[test]
fn deleting_a_saved_step_deletes_it_remotely() {
    init_logging();
    let mut s = session();
    let mut store = InMemoryStore::new();
    let doc_id = s.document().id;

    s.apply(DocMutation::AddStep { after: None }, 0);
    s.flush(&mut store).unwrap();
    assert_eq!(store.step_count(doc_id), 2);

    let second = s.document().steps[1].id;
    s.apply(DocMutation::DeleteStep { step: second }, 10);
    s.flush(&mut store).unwrap();
    assert_eq!(store.step_count(doc_id), 1);
    assert_eq!(store.load_document(doc_id).unwrap().steps.len(), 1);
}

#[test]
fn gesture_batch_undoes_as_one_step() {
    init_logging();
    let mut s = session();
    let step = s.document().steps[0].id;

    s.begin_gesture();
    for i in 0..5 {
        s.apply(
            DocMutation::SetStepContent {
                step,
                content: format!("keystroke {i}"),
            },
            i,
        );
    }
    s.end_gesture();

    assert!(s.undo(100));
    assert_eq!(s.document().steps[0].content, "");
    assert!(s.redo(200));
    assert_eq!(s.document().steps[0].content, "keystroke 4");
}
