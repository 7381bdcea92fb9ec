//! End-to-end scenarios: gestures in, actor state out

mod common;

#[cfg(test)]
mod tests {
    use super::common::{frame, hand, FIST, OPEN, POINT};
    use gesture_world::bridge::{BridgeReceiver, BridgeSender, MemorySlot};
    use gesture_world::classifier::{ClassifierConfig, GestureClassifier};
    use gesture_world::dispatcher::{DispatcherConfig, GestureDispatcher};
    use gesture_world::landmarks::HandFrame;
    use gesture_world::protocol::{direction, Action};
    use gesture_world::simulation::{ControlInput, Simulation, SimulationConfig};
    use gesture_world::types::{Aabb, Handedness, Vec3};

    /// Producer half without the async loop: classify, gate, send.
    struct Producer {
        classifier: GestureClassifier,
        dispatcher: GestureDispatcher,
        sender: BridgeSender<MemorySlot>,
    }

    impl Producer {
        fn new(slot: MemorySlot) -> Self {
            Self {
                classifier: GestureClassifier::new(ClassifierConfig::default()),
                dispatcher: GestureDispatcher::new(DispatcherConfig::default()),
                sender: BridgeSender::new(slot, "scenario"),
            }
        }

        fn observe(&mut self, frame: &HandFrame, now: f64) -> Option<Action> {
            let event = self.classifier.classify(frame)?;
            let intent = self.dispatcher.dispatch(&event, now)?;
            let action = intent.action;
            self.sender.send(intent, now);
            Some(action)
        }
    }

    fn make_sim() -> Simulation {
        let config = SimulationConfig {
            initial_heading: 0.0,
            ..Default::default()
        };
        let actor = Aabb::new(Vec3::new(-0.5, -1.0, 0.0), Vec3::new(0.5, 1.0, 1.0));
        Simulation::new(config, Ok(actor), None).unwrap()
    }

    #[test]
    fn open_open_fist_emits_move_then_pause() {
        let slot = MemorySlot::new();
        let mut producer = Producer::new(slot);

        let open = frame(hand(Handedness::Right, OPEN));
        let fist = frame(hand(Handedness::Right, FIST));

        assert_eq!(producer.observe(&open, 0.0), Some(Action::Move));
        assert_eq!(producer.observe(&open, 0.1), None);
        assert_eq!(producer.observe(&fist, 0.6), Some(Action::Pause));
    }

    #[test]
    fn gestures_drive_viewer_through_bridge() {
        let slot = MemorySlot::new();
        let mut producer = Producer::new(slot.clone());
        let mut receiver = BridgeReceiver::new(slot);
        let mut sim = make_sim();
        let idle = ControlInput::default();

        // Open palm: forward.
        producer.observe(&frame(hand(Handedness::Right, OPEN)), 100.0);
        let cmd = receiver.receive();
        assert_eq!(cmd.as_ref().and_then(|c| c.text("direction")), Some(direction::FORWARD));
        sim.step(&idle, cmd.as_ref(), 1.0);
        assert_eq!(sim.state().move_direction, 1);
        assert!(sim.state().position.y < -2.9);

        // Nothing new: keeps moving without re-applying.
        let cmd = receiver.receive();
        assert!(cmd.is_none());
        sim.step(&idle, None, 1.0);
        assert!(sim.state().position.y < -5.9);

        // Fist: pause.
        producer.observe(&frame(hand(Handedness::Right, FIST)), 100.2);
        let cmd = receiver.receive();
        sim.step(&idle, cmd.as_ref(), 1.0);
        assert!(sim.state().paused);
        let parked = sim.state().position;
        sim.step(&idle, None, 1.0);
        assert_eq!(sim.state().position, parked);

        // Left point: turn by -12 degrees.
        producer.observe(&frame(hand(Handedness::Left, POINT)), 100.4);
        let cmd = receiver.receive();
        sim.step(&idle, cmd.as_ref(), 0.0);
        assert!((sim.state().heading + 12.0).abs() < 1e-4);
    }

    #[test]
    fn gesture_overwritten_before_poll_is_lost() {
        let slot = MemorySlot::new();
        let mut producer = Producer::new(slot.clone());
        let mut receiver = BridgeReceiver::new(slot);

        producer.observe(&frame(hand(Handedness::Right, OPEN)), 50.0);
        producer.observe(&frame(hand(Handedness::Right, FIST)), 50.1);

        assert_eq!(receiver.receive().map(|c| c.action), Some(Action::Pause));
        assert!(receiver.receive().is_none());
    }

    #[test]
    fn no_hand_no_command() {
        let slot = MemorySlot::new();
        let mut producer = Producer::new(slot.clone());
        let mut receiver = BridgeReceiver::new(slot);
        assert_eq!(producer.observe(&HandFrame::empty(), 1.0), None);
        assert!(receiver.receive().is_none());
    }
}
