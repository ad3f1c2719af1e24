mod full_pipeline;
