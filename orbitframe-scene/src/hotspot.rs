//! Hotspot visibility
//!
//! Hotspots hang off the pivot node, so they follow the model through target
//! and yaw changes. Each frame a hotspot is shown only while its surface
//! normal faces the viewer.

use crate::model_scene::ModelScene;
use orbitframe_core::{Error, Hotspot, NodeId, NodeKind, Point3d, Result, Transform3D};

impl ModelScene {
    /// Attach a hotspot at `position` in model coordinates
    pub fn add_hotspot(&mut self, hotspot: Hotspot, position: Point3d) -> Result<NodeId> {
        let name = hotspot.name.clone();
        let id = self.graph.add_node(
            self.target_node,
            name,
            NodeKind::Hotspot(hotspot),
            Transform3D::translation(position.coords),
        )?;
        self.mark_dirty();
        Ok(id)
    }

    pub fn remove_hotspot(&mut self, id: NodeId) -> Result<()> {
        if self.hotspot(id).is_none() {
            return Err(Error::InvalidData(format!("node {} is not a hotspot", id.0)));
        }
        self.graph.remove(id)?;
        self.mark_dirty();
        Ok(())
    }

    /// Ids of all hotspots, in insertion order
    pub fn hotspots(&self) -> Vec<NodeId> {
        self.graph
            .children(self.target_node)
            .iter()
            .copied()
            .filter(|id| self.hotspot(*id).is_some())
            .collect()
    }

    pub fn hotspot(&self, id: NodeId) -> Option<&Hotspot> {
        self.graph.get(id).and_then(|node| node.hotspot())
    }

    /// Show hotspots whose normal faces `viewer_position` and hide the rest
    pub fn update_hotspots(&mut self, viewer_position: &Point3d) {
        let pivot = self.graph.world_transform(self.target_node);
        for id in self.hotspots() {
            let position = self.graph.world_transform(id).position();
            let Some(hotspot) = self.graph.get_mut(id).and_then(|node| node.hotspot_mut()) else {
                continue;
            };
            let view = viewer_position - position;
            let normal = pivot.transform_direction(&hotspot.normal);
            let facing = view.dot(&normal) >= 0.0;
            if facing != hotspot.shown {
                if facing {
                    hotspot.show();
                } else {
                    hotspot.hide();
                }
                self.mark_dirty();
            }
        }
    }

    /// Roll every hotspot to `radians`
    pub fn orient_hotspots(&mut self, radians: f64) {
        for id in self.hotspots() {
            if let Some(hotspot) = self.graph.get_mut(id).and_then(|node| node.hotspot_mut()) {
                hotspot.orient(radians);
            }
        }
    }

    /// Hide or restore all hotspots regardless of facing
    pub fn set_hotspots_visibility(&mut self, visible: bool) {
        for id in self.hotspots() {
            if let Some(hotspot) = self.graph.get_mut(id).and_then(|node| node.hotspot_mut()) {
                hotspot.visible = visible;
            }
        }
        self.mark_dirty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbitframe_core::Vector3d;
    use std::f64::consts::PI;

    fn scene_with_hotspot() -> (ModelScene, NodeId) {
        let mut scene = ModelScene::default();
        let id = scene
            .add_hotspot(Hotspot::new("front", Vector3d::z()), Point3d::new(0.0, 0.0, 1.0))
            .unwrap();
        (scene, id)
    }

    #[test]
    fn test_hotspot_hides_when_facing_away() {
        let (mut scene, id) = scene_with_hotspot();
        scene.update_hotspots(&Point3d::new(0.0, 0.0, 5.0));
        assert!(scene.hotspot(id).unwrap().shown);

        scene.update_hotspots(&Point3d::new(0.0, 0.0, -5.0));
        assert!(!scene.hotspot(id).unwrap().shown);
    }

    #[test]
    fn test_hotspot_follows_yaw() {
        let (mut scene, id) = scene_with_hotspot();
        scene.set_yaw(PI);
        scene.update_hotspots(&Point3d::new(0.0, 0.0, 5.0));
        assert!(!scene.hotspot(id).unwrap().shown);
        scene.update_hotspots(&Point3d::new(0.0, 0.0, -5.0));
        assert!(scene.hotspot(id).unwrap().shown);
    }

    #[test]
    fn test_visibility_switch() {
        let (mut scene, id) = scene_with_hotspot();
        scene.set_hotspots_visibility(false);
        assert!(!scene.hotspot(id).unwrap().is_drawn());
        scene.set_hotspots_visibility(true);
        scene.orient_hotspots(0.5);
        let hotspot = scene.hotspot(id).unwrap();
        assert!(hotspot.is_drawn());
        assert_eq!(hotspot.orientation, 0.5);
    }

    #[test]
    fn test_remove_hotspot() {
        let (mut scene, id) = scene_with_hotspot();
        assert_eq!(scene.hotspots(), vec![id]);
        scene.remove_hotspot(id).unwrap();
        assert!(scene.hotspots().is_empty());
        assert!(scene.remove_hotspot(id).is_err());
    }
}
