use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use robolabel::annotations::{EpisodeAnnotations, LabelIndexMap, SubtaskSegment};
use robolabel::timeline;

const EPISODES: usize = 500;
const SEGMENTS_PER_EPISODE: usize = 40;
const DISTINCT_LABELS: usize = 120;

fn corpus() -> Vec<EpisodeAnnotations> {
    (0..EPISODES)
        .map(|episode| EpisodeAnnotations {
            subtasks: (0..SEGMENTS_PER_EPISODE)
                .map(|step| SubtaskSegment {
                    start: step as f64,
                    end: step as f64 + 0.9,
                    label: format!("skill {:03}", (episode * 7 + step) % DISTINCT_LABELS),
                })
                .collect(),
            ..Default::default()
        })
        .collect()
}

fn label_index_benchmarks(c: &mut Criterion) {
    let episodes = corpus();
    c.bench_function("label_index_rebuild", |b| {
        b.iter(|| LabelIndexMap::from_episodes(black_box(&episodes)))
    });

    let labels = LabelIndexMap::from_episodes(&episodes);
    let subtasks = &episodes[0].subtasks;
    c.bench_function("timeline_layout", |b| {
        b.iter(|| {
            timeline::layout(
                black_box(subtasks),
                Some(SEGMENTS_PER_EPISODE as f64),
                &labels,
            )
        })
    });
}

criterion_group!(benches, label_index_benchmarks);
criterion_main!(benches);
