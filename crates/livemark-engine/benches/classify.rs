use criterion::{Criterion, criterion_group, criterion_main};
use livemark_engine::{
    Block, BlockTree, BlockType, Cursor, EditorHost, EditorSession, MemoryHost, Preferences,
    classify,
};
mod common;

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    group.sample_size(10);

    let lines = common::sample_lines();
    group.bench_function("trigger_lines", |b| {
        b.iter(|| {
            for line in &lines {
                std::hint::black_box(classify(std::hint::black_box(line)));
            }
        });
    });

    group.finish();
}

fn bench_typing_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("typing");
    group.sample_size(10);

    let script = common::typing_script(20);
    group.bench_function("replay", |b| {
        b.iter(|| {
            let mut tree = BlockTree::new();
            tree.push_root(Block::new(BlockType::Paragraph)).unwrap();
            let mut session = EditorSession::new(tree, Preferences::default()).unwrap();
            let mut host = MemoryHost::mirroring(session.tree(), session.cursor());
            for ch in script.chars() {
                if ch == '\n' {
                    let key = session
                        .tree_mut()
                        .push_root(Block::new(BlockType::Paragraph))
                        .unwrap();
                    host.render(session.tree(), &Cursor::caret(key, 0));
                    continue;
                }
                if let Some(event) = host.insert_char(ch) {
                    session.update_state(&mut host, event).unwrap();
                }
            }
            std::hint::black_box(session.tree().len());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_classify, bench_typing_replay);
criterion_main!(benches);
