use super::*;

#[test]
fn graph_schedules_voices_through_the_trait() {
    let mut graph = AudioGraph::new(48_000);
    {
        let out: &mut dyn VoiceOut = &mut graph;
        out.play_tone(100.0, &ToneSpec::PING).unwrap();
        let clip = AudioPcm::new(48_000, 2, vec![0.5; 96]).unwrap();
        out.play_clip(0.0, &clip).unwrap();
    }
    assert_eq!(graph.voice_count(), 2);
    let mixed = graph.mix(200.0);
    assert_eq!(mixed[0], 0.5);
}

#[test]
fn silencing_the_graph_refuses_later_voices() {
    let mut graph = AudioGraph::new(48_000);
    let out: &mut dyn VoiceOut = &mut graph;
    out.silence();
    out.silence();
    assert!(out.play_tone(0.0, &ToneSpec::SWISH).is_err());
    assert!(graph.is_closed());
}
