//! Bundled controller programs for the script-driven presets.

/// Pulse-coupled flash synchronisation.
///
/// Each robot counts up to a flash; seeing a neighbour flash advances its
/// own count, so nearby robots drift into phase.
pub const FIREFLY: &str = r#"
// Wander and avoid.
linearSpeed = MAX_FORWARD_SPEED;
if (sensorReadings.leftWall.count > 0 || sensorReadings.leftRobot.count > 0) {
    angularSpeed = MAX_ANGULAR_SPEED;
} else if (sensorReadings.rightWall.count > 0 || sensorReadings.rightRobot.count > 0) {
    angularSpeed = -MAX_ANGULAR_SPEED;
}

// Count towards the next flash.
flashOn = false;
variableA = variableA + 1;
if (sensorReadings.flash.count > 0) {
    variableA = variableA + 5;
}
if (variableA >= 100) {
    flashOn = true;
    variableA = 0;
}
execute();
"#;

/// Forage for green pucks and bring them home along the nest scent,
/// laying pheromone on the way back.
pub const FORAGE: &str = r#"
linearSpeed = MAX_FORWARD_SPEED;
angularSpeed = 0;
emitPheromone = 0;
gripperOn = greenPuckHeld || sensorReadings.innerGreenPuck.count > 0;

if (sensorReadings.leftWall.count > 0 || sensorReadings.leftRobot.count > 0) {
    angularSpeed = MAX_ANGULAR_SPEED;
} else if (sensorReadings.rightWall.count > 0 || sensorReadings.rightRobot.count > 0) {
    angularSpeed = -MAX_ANGULAR_SPEED;
} else if (greenPuckHeld) {
    emitPheromone = 10;
    if (sensorReadings.leftProbe.nestValue > sensorReadings.rightProbe.nestValue) {
        angularSpeed = -MAX_ANGULAR_SPEED;
    } else {
        angularSpeed = MAX_ANGULAR_SPEED;
    }
} else if (sensorReadings.centreProbe.pheromoneValue > 0.01) {
    if (sensorReadings.leftProbe.nestValue < sensorReadings.rightProbe.nestValue) {
        angularSpeed = -0.5 * MAX_ANGULAR_SPEED;
    } else {
        angularSpeed = 0.5 * MAX_ANGULAR_SPEED;
    }
} else if (random() < 0.05) {
    angularSpeed = (2 * random() - 1) * MAX_ANGULAR_SPEED;
    holdTime = 200;
}
execute();
"#;
