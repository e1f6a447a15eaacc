use jump_metrics_core::BodyPoint;

/// A bone drawn between two body points.
pub type SkeletonEdge = (BodyPoint, BodyPoint);

/// Hip, knee, ankle and toe chains of both legs, joined across the pelvis.
pub const LOWER_BODY_EDGES: [SkeletonEdge; 9] = [
    (BodyPoint::LeftHip, BodyPoint::RightHip),
    (BodyPoint::LeftHip, BodyPoint::LeftKnee),
    (BodyPoint::LeftKnee, BodyPoint::LeftAnkle),
    (BodyPoint::LeftAnkle, BodyPoint::LeftFootIndex),
    (BodyPoint::RightHip, BodyPoint::RightKnee),
    (BodyPoint::RightKnee, BodyPoint::RightAnkle),
    (BodyPoint::RightAnkle, BodyPoint::RightFootIndex),
    (BodyPoint::LeftAnkle, BodyPoint::LeftHeel),
    (BodyPoint::RightAnkle, BodyPoint::RightHeel),
];
