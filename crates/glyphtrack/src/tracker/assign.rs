//! Nearest-first 1:1 assignment of detections to tracks.

use nalgebra::Point2;

/// Where a track or detection is, and which glyph it shows.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Site<'a> {
    pub position: Point2<f64>,
    pub name: Option<&'a str>,
}

#[derive(Clone, Copy, Debug)]
struct MatchOption {
    track: usize,
    detection: usize,
    distance: f64,
}

fn build_match_options(
    tracks: &[Site<'_>],
    detections: &[Option<Site<'_>>],
    max_distance: f64,
    match_by_name: bool,
) -> Vec<MatchOption> {
    let mut out = Vec::new();
    for (t, track) in tracks.iter().enumerate() {
        for (d, det) in detections.iter().enumerate() {
            let Some(det) = det else {
                continue;
            };
            if match_by_name && track.name != det.name {
                continue;
            }
            let distance = (det.position - track.position).norm();
            if !(distance <= max_distance) {
                continue;
            }
            out.push(MatchOption {
                track: t,
                detection: d,
                distance,
            });
        }
    }
    out
}

/// For each detection, the index of the track it continues (if any).
///
/// All gated (track, detection) pairs are accepted closest first, skipping
/// pairs whose track or detection is already taken. Detections given as
/// `None` are never matched.
pub(crate) fn assign_nearest(
    tracks: &[Site<'_>],
    detections: &[Option<Site<'_>>],
    max_distance: f64,
    match_by_name: bool,
) -> Vec<Option<usize>> {
    let mut options = build_match_options(tracks, detections, max_distance, match_by_name);
    options.sort_by(|a, b| {
        a.distance
            .total_cmp(&b.distance)
            .then(a.track.cmp(&b.track))
            .then(a.detection.cmp(&b.detection))
    });

    let mut track_used = vec![false; tracks.len()];
    let mut assigned = vec![None; detections.len()];
    for opt in options {
        if track_used[opt.track] || assigned[opt.detection].is_some() {
            continue;
        }
        track_used[opt.track] = true;
        assigned[opt.detection] = Some(opt.track);
    }
    assigned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(x: f64, y: f64, name: &str) -> Site<'_> {
        Site {
            position: Point2::new(x, y),
            name: Some(name),
        }
    }

    #[test]
    fn closest_pair_wins_conflict() {
        let tracks = [site(0.0, 0.0, "a"), site(30.0, 0.0, "a")];
        let dets = [Some(site(25.0, 0.0, "a")), Some(site(-5.0, 0.0, "a"))];
        let got = assign_nearest(&tracks, &dets, 50.0, true);
        assert_eq!(got, vec![Some(1), Some(0)]);
    }

    #[test]
    fn greedy_is_one_to_one() {
        let tracks = [site(0.0, 0.0, "a")];
        let dets = [Some(site(1.0, 0.0, "a")), Some(site(2.0, 0.0, "a"))];
        let got = assign_nearest(&tracks, &dets, 50.0, true);
        assert_eq!(got, vec![Some(0), None]);
    }

    #[test]
    fn gates_on_distance_and_name() {
        let tracks = [site(0.0, 0.0, "a")];
        let far = [Some(site(60.0, 0.0, "a"))];
        assert_eq!(assign_nearest(&tracks, &far, 50.0, true), vec![None]);

        let other = [Some(site(1.0, 0.0, "b"))];
        assert_eq!(assign_nearest(&tracks, &other, 50.0, true), vec![None]);
        assert_eq!(assign_nearest(&tracks, &other, 50.0, false), vec![Some(0)]);

        let missing = [None];
        assert_eq!(assign_nearest(&tracks, &missing, 50.0, false), vec![None]);
    }
}
