//! Utilities for interaction of agents and environments.
use crate::{
    record::{RecordValue, Recorder},
    Env, Policy,
};
use anyhow::Result;
use log::info;

/// Run episodes with a policy and recorder, returning the return of each episode.
///
/// A record with `reward`, `episode` and `step` is written at every step,
/// merged with the record emitted by the environment.
pub fn eval_with_recorder<E, P, R>(
    env: &mut E,
    policy: &mut P,
    n_episodes: usize,
    recorder: &mut R,
) -> Result<Vec<f32>>
where
    E: Env,
    P: Policy<E> + ?Sized,
    R: Recorder + ?Sized,
{
    let mut rs = Vec::new();

    for episode in 0..n_episodes {
        let mut prev_obs = env.reset()?;
        let mut count_step = 0;
        let mut r_total = 0.0;

        loop {
            let act = policy.sample(&prev_obs);
            let (step, mut record) = env.step(&act)?;
            r_total += step.reward;

            record.insert("reward", RecordValue::Scalar(step.reward));
            record.insert("episode", RecordValue::Scalar(episode as _));
            record.insert("step", RecordValue::Scalar(count_step as _));
            recorder.write(record);

            if step.is_done() {
                break;
            }
            prev_obs = step.obs;
            count_step += 1;
        }

        info!("Episode {}, {} steps, reward = {}", episode, count_step + 1, r_total);
        rs.push(r_total);
    }

    Ok(rs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dummy::{CountingAgent, CountingEnv, CountingEnvConfig},
        record::BufferedRecorder,
    };

    #[test]
    fn writes_a_record_per_step() -> Result<()> {
        let mut env = CountingEnv::build(&CountingEnvConfig { episode_len: 2 }, 0)?;
        let mut agent = CountingAgent::default();
        let mut recorder = BufferedRecorder::new();
        let rs = eval_with_recorder(&mut env, &mut agent, 3, &mut recorder)?;
        assert_eq!(rs, vec![2.0, 2.0, 2.0]);
        assert_eq!(recorder.len(), 6);
        let last = recorder.iter().last().unwrap();
        assert_eq!(last.get_scalar("episode")?, 2.0);
        assert_eq!(last.get_scalar("step")?, 1.0);
        Ok(())
    }
}
